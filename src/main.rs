#[actix_web::main]
async fn main() {
    if let Err(err) = lgd_mapper_lib::run().await {
        eprintln!("lgd-mapper failed: {}", err);
        std::process::exit(1);
    }
}
