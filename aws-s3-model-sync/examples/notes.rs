/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;

use aws_s3_model_sync::{Collection, CollectionSyncOptions, Model, ModelSyncOptions, Selection};
use aws_sdk_s3::error::DisplayErrorContext;
use clap::Parser;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "notes")]
#[command(about = "Keeps short notes as JSON objects in an S3 bucket.")]
pub struct Args {
    /// Bucket holding the notes
    #[arg(long, required = true)]
    bucket: String,

    /// Key prefix of the notes collection
    #[arg(long, default_value = "notes")]
    prefix: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// Write a note, creating it when no id is given
    Save {
        /// Note text
        #[arg(required = true)]
        title: String,

        /// Identity of an existing note to overwrite
        #[arg(long)]
        id: Option<String>,
    },

    /// Print a single note
    Get {
        #[arg(required = true)]
        id: String,
    },

    /// Print every note
    List,

    /// Delete a single note
    Delete {
        #[arg(required = true)]
        id: String,
    },
}

fn print_note(note: &Model) -> Result<(), BoxError> {
    let json = serde_json::to_string(&note.to_json(Selection::All).into_inner())?;
    println!("{json}");
    Ok(())
}

async fn run(args: Args) -> Result<(), BoxError> {
    let config = aws_s3_model_sync::from_env()
        .default_bucket(args.bucket)
        .load()
        .await;
    let client = aws_s3_model_sync::Client::new(config);

    let note = |id: Option<String>| {
        let mut builder = Model::builder().url_root(args.prefix.as_str());
        if let Some(id) = id {
            builder = builder.attribute("id", id);
        }
        builder.build()
    };

    match args.command {
        Command::Save { title, id } => {
            let mut note = note(id);
            note.set("title", title).set("postedAt", chrono::Utc::now());
            let options = ModelSyncOptions::new().success(|_, output| {
                tracing::info!("wrote s3://{}/{}", output.bucket(), output.key())
            });
            client.save(&mut note, options).await?;
            print_note(&note)?;
        }
        Command::Get { id } => {
            let mut note = note(Some(id));
            client.fetch(&mut note, ModelSyncOptions::new()).await?;
            print_note(&note)?;
        }
        Command::List => {
            let mut notes = Collection::new(args.prefix.as_str());
            let output = client
                .fetch_collection(&mut notes, CollectionSyncOptions::new())
                .await?;
            tracing::info!("fetched {} notes under {}", notes.len(), output.prefix());
            for note in notes.models() {
                print_note(note)?;
            }
        }
        Command::Delete { id } => {
            let note = note(Some(id));
            let options = ModelSyncOptions::new().complete(|note, result| {
                tracing::info!("delete of {:?} finished, ok={}", note.id(), result.is_ok())
            });
            client.destroy(&note, options).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let result = run(args).await;

    if let Err(ref err) = result {
        tracing::error!("notes command failed: {}", DisplayErrorContext(err.as_ref()));
    }

    result
}
