//! This module provides the usergql HTTP server: an actix-web listener that relays GraphQL
//! requests to an [`Engine`] and, optionally, serves the GraphQL Playground.
//!
//! [`Engine`]: ../engine/struct.Engine.html

use crate::engine::config::Configuration;
use crate::engine::Engine;
use crate::error::Error;
use actix_cors::Cors;
use actix_web::dev::{self, ServerHandle};
use actix_web::middleware::Logger;
use actix_web::web::{self, Data, Json};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use juniper::http::playground::playground_source;
use juniper::http::GraphQLRequest;
use juniper::InputValue;
use log::{debug, error, trace};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;

#[derive(Clone)]
struct AppData {
    engine: Engine,
    gql_endpoint: String,
    playground: bool,
}

impl AppData {
    fn new(engine: Engine, gql_endpoint: String, playground: bool) -> AppData {
        AppData {
            engine,
            gql_endpoint,
            playground,
        }
    }
}

/// A GraphQL request carried in the query string of a `GET`, with `variables` as JSON text
#[derive(Debug, Deserialize)]
struct GetGraphQLRequest {
    query: String,
    #[serde(rename = "operationName")]
    operation_name: Option<String>,
    variables: Option<String>,
}

impl GetGraphQLRequest {
    fn into_request(self) -> Result<GraphQLRequest, Error> {
        let variables = self
            .variables
            .map(|v| serde_json::from_str::<InputValue>(&v))
            .transpose()
            .map_err(|e| Error::VariablesNotParsed { source: e })?;

        Ok(GraphQLRequest::new(
            self.query,
            self.operation_name,
            variables,
        ))
    }
}

fn error_body(message: String) -> serde_json::Value {
    json!({ "errors": [{ "message": message }] })
}

async fn respond(engine: &Engine, req: &GraphQLRequest) -> HttpResponse {
    match engine.execute_request(req).await {
        // Parse and validation failures carry no data key.
        Ok(body) if body.get("data").is_some() => HttpResponse::Ok().json(body),
        Ok(body) => HttpResponse::BadRequest().json(body),
        Err(e) => {
            error!("Failed to relay GraphQL response: {}", e);
            HttpResponse::InternalServerError().json(error_body(e.to_string()))
        }
    }
}

async fn graphql(data: Data<AppData>, req: Json<GraphQLRequest>) -> HttpResponse {
    debug!("graphql handler -- operation: {:?}", req.operation_name);
    respond(&data.engine, &req).await
}

/// Answers `GET` at the endpoint. A `query` parameter is executed like a POSTed request;
/// without one the playground is served, if enabled.
async fn graphql_get(data: Data<AppData>, http_req: HttpRequest) -> HttpResponse {
    match web::Query::<GetGraphQLRequest>::from_query(http_req.query_string()) {
        Ok(get_req) => match get_req.into_inner().into_request() {
            Ok(req) => {
                debug!("graphql_get handler -- operation: {:?}", req.operation_name);
                respond(&data.engine, &req).await
            }
            Err(e) => HttpResponse::BadRequest().json(error_body(e.to_string())),
        },
        Err(_) if data.playground => graphiql(&data.gql_endpoint),
        Err(e) => HttpResponse::BadRequest().json(error_body(e.to_string())),
    }
}

fn graphiql(gql_endpoint: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(playground_source(gql_endpoint, None))
}

/// Any origin may call the endpoint, as browser tools on other hosts expect
fn cors() -> Cors {
    Cors::permissive()
}

/// Registers the GraphQL endpoint for `POST` and `GET` on an actix-web app. The app must carry
/// the `AppData` built by [`Server`].
///
/// [`Server`]: ./struct.Server.html
fn routes(cfg: &mut web::ServiceConfig, gql_endpoint: &str) {
    cfg.service(
        web::resource(gql_endpoint)
            .route(web::post().to(graphql))
            .route(web::get().to(graphql_get)),
    );
}

/// Formats the URL announced at startup. Wildcard listeners are announced as `localhost`.
fn ready_url(addr: &SocketAddr, gql_endpoint: &str) -> String {
    if addr.ip().is_unspecified() {
        format!("http://localhost:{}{}", addr.port(), gql_endpoint)
    } else {
        format!("http://{}{}", addr, gql_endpoint)
    }
}

/// A usergql GraphQL server.
///
/// The [`Server`] wraps an actix-web HTTP server around an [`Engine`]. It listens where its
/// [`Configuration`] says, which by default is port 4000 on all interfaces with the GraphQL
/// endpoint at `/graphql`.
///
/// [`Server`]: ./struct.Server.html
/// [`Engine`]: ../engine/struct.Engine.html
/// [`Configuration`]: ../engine/config/struct.Configuration.html
///
/// # Examples
///
/// ```rust,no_run
/// use usergql::engine::config::Configuration;
/// use usergql::engine::schema::static_user;
/// use usergql::{Engine, Server};
///
/// # #[actix_web::main]
/// # async fn main() -> Result<(), usergql::Error> {
/// let server = Server::new(Configuration::default(), Engine::new(static_user())).bind()?;
/// println!("Server ready at {}", server.url());
/// server.serve().await
/// # }
/// ```
#[derive(Clone)]
pub struct Server {
    config: Configuration,
    engine: Engine,
}

impl Server {
    pub fn new(config: Configuration, engine: Engine) -> Server {
        Server { config, engine }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Binds the listener and returns a [`RunningServer`] that has not started accepting
    /// requests yet. Must be called from within an actix or tokio runtime.
    ///
    /// [`RunningServer`]: ./struct.RunningServer.html
    ///
    /// # Errors
    ///
    /// * [`AddrInUse`] - if another server is already bound to the port as a listener
    /// * [`AddrNotAvailable`] - if the address cannot be bound, for example if it is not local
    /// * [`ConfigVersionMismatched`] or [`ConfigItemInvalid`] - if the configuration is invalid
    ///
    /// [`AddrInUse`]: ../enum.Error.html#variant.AddrInUse
    /// [`AddrNotAvailable`]: ../enum.Error.html#variant.AddrNotAvailable
    /// [`ConfigVersionMismatched`]: ../enum.Error.html#variant.ConfigVersionMismatched
    /// [`ConfigItemInvalid`]: ../enum.Error.html#variant.ConfigItemInvalid
    pub fn bind(&self) -> Result<RunningServer, Error> {
        trace!("Server::bind called -- config: {:?}", self.config);
        self.config.validate()?;

        let gql_endpoint = self.config.graphql_endpoint().to_string();
        let playground = self.config.playground();
        let app_data = Data::new(AppData::new(
            self.engine.clone(),
            gql_endpoint.clone(),
            playground,
        ));

        let route_endpoint = gql_endpoint.clone();
        let srv = HttpServer::new(move || {
            let endpoint = route_endpoint.clone();
            App::new()
                .app_data(app_data.clone())
                .wrap(Logger::default())
                .wrap(cors())
                .configure(move |cfg| routes(cfg, &endpoint))
        })
        .bind((self.config.bind_addr(), self.config.bind_port()))
        .map_err(|e| {
            trace!("Error binding server: {:?}", e);
            Error::from_bind(e)
        })?;

        let addr = srv.addrs().into_iter().next().ok_or_else(|| Error::AddrNotAvailable {
            source: std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "listener resolved to no address",
            ),
        })?;
        let url = ready_url(&addr, &gql_endpoint);
        debug!("Server::bind -- listening on {}", url);

        Ok(RunningServer {
            addr,
            url,
            server: srv.run(),
        })
    }
}

/// A bound [`Server`]. Requests are answered once [`serve`] is awaited or the server is
/// [`spawn`]ed.
///
/// [`Server`]: ./struct.Server.html
/// [`serve`]: #method.serve
/// [`spawn`]: #method.spawn
pub struct RunningServer {
    addr: SocketAddr,
    url: String,
    server: dev::Server,
}

impl RunningServer {
    /// Returns the address the listener is bound to, with the real port if port 0 was configured
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the URL of the GraphQL endpoint, as announced at startup
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns a handle that can stop the server
    pub fn handle(&self) -> ServerHandle {
        self.server.handle()
    }

    /// Answers requests until the server is stopped.
    ///
    /// # Errors
    ///
    /// * [`ServerStartupFailed`] - if the server stops with an I/O error
    ///
    /// [`ServerStartupFailed`]: ../enum.Error.html#variant.ServerStartupFailed
    pub async fn serve(self) -> Result<(), Error> {
        self.server
            .await
            .map_err(|e| Error::ServerStartupFailed { source: e })
    }

    /// Runs the server in the background on the current runtime and returns a handle to stop
    /// it. `handle.stop(true).await` shuts it down gracefully.
    pub fn spawn(self) -> ServerHandle {
        let handle = self.server.handle();
        actix_web::rt::spawn(self.server);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::{cors, ready_url, routes, AppData};
    use crate::engine::schema::static_user;
    use crate::engine::Engine;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::web::Data;
    use actix_web::App;
    use serde_json::json;

    fn app_data(playground: bool) -> Data<AppData> {
        Data::new(AppData::new(
            Engine::new(static_user()),
            "/graphql".to_string(),
            playground,
        ))
    }

    #[test]
    fn ready_url_wildcard() {
        let addr = "0.0.0.0:4000".parse().unwrap();

        assert_eq!(
            ready_url(&addr, "/graphql"),
            "http://localhost:4000/graphql"
        );
    }

    #[test]
    fn ready_url_specific() {
        let addr = "127.0.0.1:5000".parse().unwrap();

        assert_eq!(ready_url(&addr, "/gql"), "http://127.0.0.1:5000/gql");
    }

    /// Passes if a POSTed query is answered with the requested fields
    #[actix_web::test]
    async fn post_query() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(true))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/graphql")
            .set_json(json!({"query": "query { GetUser(user_id: \"1\") { id name } }"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"data": {"GetUser": {"id": "8ab517a4-1234-1234-1234-81d618d0b7b7", "name": "Test user"}}})
        );
    }

    /// Passes if variables and operation names in the body are honored
    #[actix_web::test]
    async fn post_query_with_variables() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(true))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/graphql")
            .set_json(json!({
                "query": "query A($id: String!) { GetUser(user_id: $id) { type } } query B { GetUser(user_id: \"\") { age } }",
                "operationName": "B",
                "variables": {}
            }))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({"data": {"GetUser": {"age": 25}}}));
    }

    /// Passes if a validation failure is answered with a GraphQL error body
    #[actix_web::test]
    async fn post_missing_argument() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(true))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/graphql")
            .set_json(json!({"query": "query { GetUser { id } }"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert!(body.get("data").is_none());
        assert!(body["errors"].is_array());
    }

    /// Passes if a body that is not a GraphQL request is rejected by the transport
    #[actix_web::test]
    async fn post_not_json() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(true))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/graphql")
            .insert_header(("content-type", "application/json"))
            .set_payload("not json")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    /// Passes if a query in the query string of a GET is executed
    #[actix_web::test]
    async fn get_query() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(true))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/graphql?query=%7BGetUser(user_id%3A%221%22)%7Bname%7D%7D")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(body, json!({"data": {"GetUser": {"name": "Test user"}}}));
    }

    /// Passes if GET carries variables and an operation name as query parameters
    #[actix_web::test]
    async fn get_query_with_variables() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(false))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri(
                "/graphql?query=query%20Q(%24id%3AString!)%7BGetUser(user_id%3A%24id)%7Bage%7D%7D\
                 &operationName=Q&variables=%7B%22id%22%3A%22x%22%7D",
            )
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({"data": {"GetUser": {"age": 25}}}));
    }

    /// Passes if variables that are not JSON are refused
    #[actix_web::test]
    async fn get_query_bad_variables() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(true))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/graphql?query=%7BGetUser(user_id%3A%221%22)%7Bname%7D%7D&variables=nope")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert!(body["errors"].is_array());
    }

    /// Passes if the playground is served on GET without a query
    #[actix_web::test]
    async fn get_playground() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(true))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::get().uri("/graphql").to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = actix_test::read_body(res).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("GraphQL Playground"));
        assert!(html.contains("/graphql"));
    }

    /// Passes if a GET without a query is refused when the playground is disabled
    #[actix_web::test]
    async fn get_without_playground() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(false))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::get().uri("/graphql").to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    /// Passes if a cross-origin preflight for POST is allowed
    #[actix_web::test]
    async fn cors_preflight() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(true))
                .wrap(cors())
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/graphql")
            .insert_header(("Origin", "http://example.com"))
            .insert_header(("Access-Control-Request-Method", "POST"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert!(res.status().is_success());
        let acao = res
            .headers()
            .get("access-control-allow-origin")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(acao == "http://example.com" || acao == "*");
    }

    /// Passes if paths other than the endpoint are not found
    #[actix_web::test]
    async fn unknown_path() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data(true))
                .configure(|cfg| routes(cfg, "/graphql")),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/other")
            .set_json(json!({"query": "{ GetUser(user_id: \"1\") { id } }"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
