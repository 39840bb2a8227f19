use anyhow::Context;
use dialoguer::theme::Theme;
use dialoguer::{Input, Select};
use tracing::info;

use crate::camera::{CameraProfile, CameraStore};
use crate::components::number_field::{parse_qe, prompt_field};

const NEW_CAMERA: &str = "New camera...";

/// Labels of the six QE fields, in [`CameraProfile::from_values`] order.
const QE_FIELDS: [&str; 6] = [
    "Red QE at H-alpha (656.3 nm)",
    "Green QE at H-alpha (656.3 nm)",
    "Blue QE at H-alpha (656.3 nm)",
    "Red QE at OIII (500.7 nm)",
    "Green QE at OIII (500.7 nm)",
    "Blue QE at OIII (500.7 nm)",
];

/// First screen: pick or create a camera and edit its quantum efficiencies.
///
/// Whatever is confirmed here is written to the store before returning.
pub fn camera_profile_screen(
    theme: &dyn Theme,
    store: &mut CameraStore,
    preselect: Option<&str>,
) -> anyhow::Result<(String, CameraProfile)> {
    let names: Vec<String> = store.names().into_iter().map(str::to_string).collect();
    let mut items: Vec<&str> = names.iter().map(String::as_str).collect();
    items.push(NEW_CAMERA);

    let default_index = preselect
        .and_then(|p| names.iter().position(|n| n == p.trim()))
        .unwrap_or(0);

    let choice = Select::with_theme(theme)
        .with_prompt("Camera")
        .items(&items)
        .default(default_index)
        .interact()?;

    let (name, base) = if choice == names.len() {
        let name: String = Input::with_theme(theme)
            .with_prompt("Camera name")
            .validate_with(|s: &String| {
                if s.trim().is_empty() {
                    Err("Name cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        let base = store.get(&name).copied();
        (name.trim().to_string(), base)
    } else {
        let name = names[choice].clone();
        let base = store.get(&name).copied();
        (name, base)
    };

    let defaults = base.map(|p| p.values());
    let mut values = [0.0f64; 6];
    for (i, label) in QE_FIELDS.iter().enumerate() {
        values[i] = prompt_field(theme, label, defaults.map(|d| d[i]), parse_qe)?;
    }

    let profile = CameraProfile::from_values(values)?;
    store
        .upsert(&name, profile)
        .with_context(|| format!("Failed to save camera '{}'", name))?;
    info!("Camera '{}' selected", name);
    Ok((name, profile))
}
