use engine::scene::SceneError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error(transparent)]
    Scene(#[from] SceneError),
}
