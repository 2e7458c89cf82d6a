//! Print the OpenAPI document as JSON.

use movies::ApiDoc;
use utoipa::OpenApi;

fn main() -> std::io::Result<()> {
    let json = ApiDoc::openapi().to_json().map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}
