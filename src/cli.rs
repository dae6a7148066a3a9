use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::demo::{
    self, Console, DEFAULT_CONTAINER, DEFAULT_INPUT_FILE, DEFAULT_OBJECT_NAME,
    DEFAULT_OUTPUT_FILE, DemoPlan,
};
use crate::error::Result;
use crate::storage::{ContainerAccess, StorageClient};

#[derive(Parser, Debug)]
#[command(name = "blobtour")]
#[command(about = "Walk a container and its objects through their lifecycle")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a container, upload, list, download, delete and list again
    Run(RunArgs),
    /// Make a container if it does not exist
    Mb {
        container: String,
        /// Make object contents publicly readable
        #[arg(long)]
        public: bool,
    },
    /// Upload a local file as an object
    Put {
        container: String,
        local: PathBuf,
        /// Object name; defaults to the file name
        #[arg(long)]
        name: Option<String>,
    },
    /// List objects in a container
    Ls {
        container: String,
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Download an object to a local file
    Get {
        container: String,
        object: String,
        local: PathBuf,
    },
    /// Delete an object
    Rm { container: String, object: String },
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, env = "BLOBTOUR_CONTAINER", default_value = DEFAULT_CONTAINER)]
    pub container: String,
    #[arg(long, env = "BLOBTOUR_INPUT", default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,
    #[arg(long, env = "BLOBTOUR_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,
    #[arg(long, env = "BLOBTOUR_OBJECT", default_value = DEFAULT_OBJECT_NAME)]
    pub object: String,
    /// Make object contents publicly readable
    #[arg(long, env = "BLOBTOUR_PUBLIC")]
    pub public: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        DemoPlan::default().into()
    }
}

impl From<DemoPlan> for RunArgs {
    fn from(plan: DemoPlan) -> Self {
        Self {
            container: plan.container,
            input: plan.input,
            output: plan.output,
            object: plan.object_name,
            public: plan.access == ContainerAccess::Blob,
        }
    }
}

impl From<RunArgs> for DemoPlan {
    fn from(args: RunArgs) -> Self {
        Self {
            container: args.container,
            input: args.input,
            output: args.output,
            object_name: args.object,
            access: ContainerAccess::from_public_flag(args.public),
        }
    }
}

pub async fn run(args: Args, client: StorageClient) -> Result<()> {
    let stdout = io::stdout();
    let mut console = Console::new(stdout.lock());

    match args.command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(run_args) => {
            let plan = DemoPlan::from(run_args);
            demo::run_demo(&client, &plan, &mut console).await?;
        }
        Command::Mb { container, public } => {
            let container = client
                .ensure_container(&container, ContainerAccess::from_public_flag(public))
                .await?;
            console.line(format_args!("Container ready: {}", container.name()))?;
        }
        Command::Put {
            container,
            local,
            name,
        } => {
            let container = client.container(&container)?;
            let object = client
                .upload_object(&container, &local, name.as_deref())
                .await?;
            console.line(format_args!(
                "Uploaded: {} -> {} ({} bytes)",
                local.display(),
                object.address,
                object.size
            ))?;
        }
        Command::Ls { container, json } => {
            let container = client.container(&container)?;
            let objects = client.list_objects(&container).await?;
            if json {
                for object in &objects {
                    let line = serde_json::to_string(object)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                    console.line(line)?;
                }
            } else {
                console.objects(&objects)?;
            }
        }
        Command::Get {
            container,
            object,
            local,
        } => {
            let container = client.container(&container)?;
            let size = client.download_object(&container, &object, &local).await?;
            console.line(format_args!(
                "Downloaded to: {} ({size} bytes)",
                local.display()
            ))?;
        }
        Command::Rm { container, object } => {
            let container = client.container(&container)?;
            client.delete_object(&container, &object).await?;
            console.line(format_args!("Deleted: {object}"))?;
        }
    }

    console.into_inner().flush()?;
    Ok(())
}
