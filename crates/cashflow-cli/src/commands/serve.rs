//! Server command implementation

use std::path::Path;

use anyhow::Result;
use cashflow_core::config::{Config, ServerSettings};

use super::{build_generator, open_db};

pub async fn cmd_serve(db_path: &Path, config: &Config, settings: ServerSettings) -> Result<()> {
    println!("🚀 Starting Cashflow web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", settings.host, settings.port);
    if !settings.allowed_origins.is_empty() {
        println!("   CORS origins: {}", settings.allowed_origins.join(", "));
    }

    let db = open_db(db_path)?;
    let generator = build_generator(config);

    cashflow_server::serve(db, generator, &settings).await
}
