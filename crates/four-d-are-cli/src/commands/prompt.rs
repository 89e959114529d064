//! Prompt command: show what would be sent, without any network call.

use four_d_are_core::{build_system_prompt, build_user_prompt};

use super::{resolve_inputs, InputArgs};

pub fn run(query: &str, input: &InputArgs) -> anyhow::Result<()> {
    anyhow::ensure!(!query.trim().is_empty(), "Query must not be empty");

    let (template, context) = resolve_inputs(input)?;
    for (dimension, key) in context.unknown_keys(&template) {
        tracing::debug!(%dimension, key = %key, "Key not declared by template");
    }

    println!("=== SYSTEM ===\n{}\n", build_system_prompt(&template));
    println!("=== USER ===\n{}", build_user_prompt(query, &context));
    Ok(())
}
