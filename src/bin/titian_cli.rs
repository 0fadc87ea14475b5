//! Titian CLI - Bridge interface for non-Rust callers
//!
//! Commands: templates, slug, validate, normalize, render
//! Outputs JSON to stdout
//! Returns non-zero on validation failure

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use titian_core::{
    templates::FieldKind, ContentPipeline, PageDraft, ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "titian-cli")]
#[command(about = "Titian CLI - Template-Driven Content Engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the template schemas
    Templates,

    /// Derive a URL slug from a title
    Slug {
        /// Page title
        title: String,
    },

    /// Validate a page draft
    Validate {
        /// JSON payload (PageDraft)
        #[arg(short, long)]
        payload: String,
    },

    /// Decode and re-encode a content blob to its canonical schema form
    Normalize {
        /// Template name
        #[arg(short, long)]
        template: String,

        /// JSON payload (content blob)
        #[arg(short, long)]
        payload: String,
    },

    /// Render a content blob to a presentation tree
    Render {
        /// Template name
        #[arg(short, long)]
        template: String,

        /// Page title
        #[arg(long, default_value = "")]
        title: String,

        /// JSON payload (content blob)
        #[arg(short, long)]
        payload: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let pipeline = ContentPipeline::new();

    match cli.command {
        Commands::Templates => {
            let templates: Vec<_> = pipeline
                .registry()
                .list()
                .iter()
                .map(|schema| {
                    serde_json::json!({
                        "id": schema.id,
                        "fields": schema.fields.iter().map(|f| {
                            let mut field = serde_json::json!({
                                "name": f.name,
                                "kind": f.kind.kind_name(),
                            });
                            if let FieldKind::List(record) = &f.kind {
                                field["record"] = record.fields.iter().map(|sub| {
                                    serde_json::json!({
                                        "name": sub.name,
                                        "kind": sub.kind.kind_name(),
                                    })
                                }).collect::<Vec<_>>().into();
                            }
                            field
                        }).collect::<Vec<_>>(),
                    })
                })
                .collect();

            let output = serde_json::json!({
                "engine_version": ENGINE_VERSION,
                "templates": templates,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Slug { title } => {
            let output = serde_json::json!({ "slug": titian_core::derive_slug(&title) });
            println!("{}", serde_json::to_string(&output).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Validate { payload } => {
            let draft: PageDraft = match serde_json::from_str(&payload) {
                Ok(d) => d,
                Err(e) => {
                    println!(r#"{{"valid": false, "error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            match pipeline.check(&draft) {
                Ok(result) => {
                    println!("{}", serde_json::to_string_pretty(&result).unwrap());
                    if result.valid {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2) // Validation failure
                    }
                }
                Err(e) => {
                    println!(r#"{{"valid": false, "error": "{}"}}"#, e);
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Normalize { template, payload } => {
            let blob: serde_json::Value = match serde_json::from_str(&payload) {
                Ok(b) => b,
                Err(e) => {
                    println!(r#"{{"error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let schema = match pipeline.registry().schema(&template) {
                Some(schema) => schema,
                None => {
                    println!(r#"{{"error": "Unknown template: {}"}}"#, template);
                    return ExitCode::FAILURE;
                }
            };

            let normalized = titian_core::encode(schema, &titian_core::decode(schema, &blob));
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(normalized)).unwrap()
            );
            ExitCode::SUCCESS
        }

        Commands::Render { template, title, payload } => {
            let blob: serde_json::Value = match serde_json::from_str(&payload) {
                Ok(b) => b,
                Err(e) => {
                    println!(r#"{{"error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let presentation = pipeline.render_blob(&template, &title, &blob);
            println!("{}", serde_json::to_string_pretty(&presentation).unwrap());
            ExitCode::SUCCESS
        }
    }
}
