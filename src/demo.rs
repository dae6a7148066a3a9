//! The scripted container and object lifecycle walk-through.
//!
//! Every step prints a banner and its result lines to the given writer and
//! aborts the sequence on the first failure. Nothing is cleaned up on error.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::storage::{Container, ContainerAccess, ObjectDescriptor, StorageClient};
use crate::wrap_err;

pub const DEFAULT_CONTAINER: &str = "test-container";
pub const DEFAULT_INPUT_FILE: &str = "TextFile1.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "TextFile2.txt";
pub const DEFAULT_OBJECT_NAME: &str = "blobtest";

const BANNER: &str = "=============================================================";

/// Names and paths threaded through the demo sequence.
#[derive(Debug, Clone)]
pub struct DemoPlan {
    pub container: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub object_name: String,
    pub access: ContainerAccess,
}

impl Default for DemoPlan {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            input: PathBuf::from(DEFAULT_INPUT_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            object_name: DEFAULT_OBJECT_NAME.to_string(),
            access: ContainerAccess::Private,
        }
    }
}

/// What the two listings of a demo run observed.
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub first_listing: Vec<ObjectDescriptor>,
    pub final_listing: Vec<ObjectDescriptor>,
}

/// Console side of the demo: banners and per-step result lines.
pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn header(&mut self, title: &str) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{BANNER}")?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{BANNER}")?;
        Ok(())
    }

    pub fn objects(&mut self, objects: &[ObjectDescriptor]) -> Result<()> {
        if objects.is_empty() {
            writeln!(self.out, "There are no objects to list")?;
            writeln!(self.out)?;
        }
        for object in objects {
            writeln!(self.out, "{object}")?;
        }
        Ok(())
    }

    pub fn line(&mut self, line: impl std::fmt::Display) -> Result<()> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}

pub async fn ensure_container<W: Write>(
    client: &StorageClient,
    console: &mut Console<W>,
    name: &str,
    access: ContainerAccess,
) -> Result<Container> {
    let title = format!("Create Container: {name}");
    console.header(&title)?;
    wrap_err!(
        client.ensure_container(name, access).await,
        StepFailed { step: title }
    )
}

/// Upload `local_path`, naming the object after the file when `object_name` is `None`.
pub async fn upload_object<W: Write>(
    client: &StorageClient,
    console: &mut Console<W>,
    container: &Container,
    local_path: &Path,
    object_name: Option<&str>,
) -> Result<ObjectDescriptor> {
    let shown = object_name
        .map(str::to_string)
        .or_else(|| local_path.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| local_path.display().to_string());
    let title = format!("Uploading Object: {shown}");
    console.header(&title)?;
    wrap_err!(
        client.upload_object(container, local_path, object_name).await,
        StepFailed { step: title }
    )
}

pub async fn list_objects<W: Write>(
    client: &StorageClient,
    console: &mut Console<W>,
    container: &Container,
) -> Result<Vec<ObjectDescriptor>> {
    let title = format!("Listing Objects in {}", container.name());
    console.header(&title)?;
    let objects = wrap_err!(
        client.list_objects(container).await,
        StepFailed { step: title }
    )?;
    console.objects(&objects)?;
    Ok(objects)
}

pub async fn download_object<W: Write>(
    client: &StorageClient,
    console: &mut Console<W>,
    container: &Container,
    object_name: &str,
    local_path: &Path,
) -> Result<u64> {
    let title = format!("Downloading Object: {object_name}");
    console.header(&title)?;
    let size = wrap_err!(
        client
            .download_object(container, object_name, local_path)
            .await,
        StepFailed { step: title }
    )?;
    console.line(format_args!("Downloaded to: {}", local_path.display()))?;
    console.line("")?;
    Ok(size)
}

pub async fn delete_object<W: Write>(
    client: &StorageClient,
    console: &mut Console<W>,
    container: &Container,
    object_name: &str,
) -> Result<()> {
    let title = format!("Deleting Object: {object_name}");
    console.header(&title)?;
    wrap_err!(
        client.delete_object(container, object_name).await,
        StepFailed { step: title }
    )
}

/// Run the whole sequence: create, upload twice, list, download, delete, list.
///
/// Only the explicitly named object is deleted; the one named after the
/// input file stays in the container.
pub async fn run_demo<W: Write>(
    client: &StorageClient,
    plan: &DemoPlan,
    console: &mut Console<W>,
) -> Result<DemoReport> {
    log::info!(
        "starting demo container={} input={} output={}",
        plan.container,
        plan.input.display(),
        plan.output.display()
    );

    let container = ensure_container(client, console, &plan.container, plan.access).await?;

    upload_object(client, console, &container, &plan.input, Some(&plan.object_name)).await?;
    upload_object(client, console, &container, &plan.input, None).await?;

    let first_listing = list_objects(client, console, &container).await?;

    download_object(client, console, &container, &plan.object_name, &plan.output).await?;

    delete_object(client, console, &container, &plan.object_name).await?;

    let final_listing = list_objects(client, console, &container).await?;

    Ok(DemoReport {
        first_listing,
        final_listing,
    })
}
