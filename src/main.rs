use usergql::engine::schema::static_user;
use usergql::{Configuration, Engine, Error, Server};

#[actix_web::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let engine = Engine::new(static_user());
    let server = Server::new(Configuration::default(), engine).bind()?;

    println!("🚀 Server ready at {}", server.url());
    server.serve().await
}
