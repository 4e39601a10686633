use thiserror::Error;

/// Sum-type error surfaced at the CLI boundary. One file's failure never
/// aborts the batch; `main` maps each variant to an exit code.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("out of memory: requested buffer of {0} pixels")]
    OutOfMemory(usize),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Requested pixel count beyond which we refuse to allocate rather than
/// let the process abort on OOM (Rust's global allocator aborts, it
/// cannot be caught as a `Result`; see DESIGN.md Open Question 5).
const MAX_IMAGE_PIXELS: usize = 64_000 * 64_000;

pub fn checked_image_pixels(width: usize, height: usize) -> EngineResult<usize> {
    let pixels = width.checked_mul(height).ok_or(EngineError::OutOfMemory(usize::MAX))?;
    if pixels > MAX_IMAGE_PIXELS {
        return Err(EngineError::OutOfMemory(pixels));
    }
    Ok(pixels)
}
