use bsides_loader::error::BsidesError;
use bsides_loader::session::Session;
use log::debug;

#[tokio::main]
async fn main() -> Result<(), BsidesError> {
    env_logger::init();

    let session = Session::bootstrap()?;
    debug!("Dataset preview:\n{}", session.dataset);

    Ok(())
}
