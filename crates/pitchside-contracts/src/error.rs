use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Font error: {0}")]
    Font(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Raster error: {0}")]
    Raster(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
