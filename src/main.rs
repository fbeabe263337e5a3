use swap_router::RouterBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	RouterBuilder::new().start_server().await
}
