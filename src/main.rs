use dashboard_profile::config::{ServerConfig, CONFIG_PATH};
use dashboard_profile::http_server::{serve, SAVE_PATH};
use dashboard_profile::tools::timestamp;
use std::sync::Arc;
use tokio::sync::Mutex;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        println!("{}  Error: {}", timestamp(), e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let config = ServerConfig::load(CONFIG_PATH)?.apply_args(std::env::args().skip(1))?;
    let store = Arc::new(Mutex::new(config.store()));

    let listener = tokio::net::TcpListener::bind(&config.listener).await?;
    let port = listener.local_addr()?.port();
    println!("{}  保存API服务器启动在端口 {}", timestamp(), port);
    println!("访问地址: http://localhost:{}{}", port, SAVE_PATH);
    println!("按 Ctrl+C 停止服务器");

    serve(listener, store, shutdown_signal()).await?;
    println!("\n{}  服务器已停止", timestamp());
    Ok(())
}
