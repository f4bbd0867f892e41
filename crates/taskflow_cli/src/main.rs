//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskflow_core` linkage and
//!   the document pipeline end to end.
//! - Keep output deterministic for quick local sanity checks.

use taskflow_core::db::open_db_in_memory;
use taskflow_core::{DocumentService, SqliteDocumentRepository};

fn main() {
    println!("taskflow_core ping={}", taskflow_core::ping());
    println!("taskflow_core version={}", taskflow_core::core_version());

    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("taskflow_core db_open failed: {err}");
            std::process::exit(1);
        }
    };
    let repo = match SqliteDocumentRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("taskflow_core repository setup failed: {err}");
            std::process::exit(1);
        }
    };

    let service = DocumentService::open(repo);
    let summary = service.summary();
    println!(
        "taskflow_core blocks={} title={}",
        service.blocks().len(),
        summary.title.unwrap_or_default()
    );
}
