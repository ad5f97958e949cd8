use anyhow::Context;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    optik_invoice_server::run()
        .await
        .context("invoice server stopped with an error")
}
