//! Runs one conversion recipe against a loaded engine.
//!
//! Steps run strictly in order: stage every input, exec the command, read
//! the output. The first failure aborts the rest. Whatever happened, the
//! recipe's files are then removed from the engine's virtual filesystem.

use bytes::Bytes;
use mf_av::{Engine, Recipe};
use mf_core::{Error, Result};

use crate::slots::Slots;

/// Run `recipe` with the files held in `slots` and return the output bytes.
///
/// # Errors
///
/// Returns [`Error::Pipeline`] naming the failed step, or
/// [`Error::MissingInput`] if a slot the recipe stages is empty.
pub async fn run(engine: &dyn Engine, recipe: &Recipe, slots: &Slots) -> Result<Bytes> {
    let result = stage_exec_read(engine, recipe, slots).await;
    cleanup(engine, recipe).await;
    result
}

async fn stage_exec_read(engine: &dyn Engine, recipe: &Recipe, slots: &Slots) -> Result<Bytes> {
    for input in &recipe.inputs {
        let file = slots
            .get(input.slot)
            .ok_or_else(|| Error::MissingInput(format!("no {} file selected", input.slot)))?;

        tracing::debug!(
            "Staging {} ({} bytes) as {}",
            file.name(),
            file.len(),
            input.name
        );
        engine
            .write_file(input.name, file.bytes())
            .await
            .map_err(|e| Error::pipeline(format!("stage {}", input.slot), e.to_string()))?;
    }

    tracing::info!("Running {} {}", engine.name(), recipe.argv.join(" "));
    engine
        .exec(&recipe.argv)
        .await
        .map_err(|e| Error::pipeline("exec", e.to_string()))?;

    let bytes = engine
        .read_file(recipe.output)
        .await
        .map_err(|e| Error::pipeline("read output", e.to_string()))?;

    if bytes.is_empty() {
        return Err(Error::pipeline(
            "read output",
            format!("{} is empty", recipe.output),
        ));
    }

    Ok(bytes)
}

async fn cleanup(engine: &dyn Engine, recipe: &Recipe) {
    for name in recipe.touched_files() {
        if let Err(e) = engine.delete_file(name).await {
            tracing::warn!("Failed to remove {name} from the engine filesystem: {e}");
        }
    }
}
