//! OpenAPI Specification Generator Binary
//!
//! Prints the Course Review OpenAPI document as JSON to stdout.
//!
//! Usage:
//!   cargo run -p coursereview-api --bin generate-openapi > openapi.json

use coursereview_api::ApiDoc;

fn main() {
    match ApiDoc::to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI spec: {}", e);
            std::process::exit(1);
        }
    }
}
