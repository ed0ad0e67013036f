//! TypeScript declarations for the types a web front end exchanges with the session.

use crate::clock::{PendingTick, TimerEffect};
use crate::config::PlaybackConfig;
use crate::library::{Bookmark, HistorySummary};
use crate::orp::EmphasisSplit;
use crate::session::{SessionCommand, SessionEvent, SessionSnapshot, SettingsPatch, SettingsView};
use crate::tokenizer::Token;
use crate::window::{RenderWindow, Segment};
use std::fs;
use std::path::Path;
use tracing::info;
use ts_rs::TS;

fn export_single_type<T: TS + 'static>(out_dir: &Path, names: &mut Vec<String>) -> Result<(), String> {
    T::export_all_to(out_dir).map_err(|err| format!("Failed to export {}: {err}", T::name()))?;
    names.push(T::name());
    Ok(())
}

/// Write one `.ts` file per type into `out_dir` plus an `index.ts` re-exporting them.
/// Stale `.ts` files from earlier runs are removed first.
pub fn export_ts_bindings(out_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(out_dir)
        .map_err(|err| format!("Failed to create {}: {err}", out_dir.display()))?;

    for entry in fs::read_dir(out_dir)
        .map_err(|err| format!("Failed to list {}: {err}", out_dir.display()))?
    {
        let entry = entry.map_err(|err| format!("Failed to read entry: {err}"))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path)
                .map_err(|err| format!("Failed to remove {}: {err}", path.display()))?;
        }
    }

    let mut names = Vec::new();
    export_single_type::<Token>(out_dir, &mut names)?;
    export_single_type::<EmphasisSplit>(out_dir, &mut names)?;
    export_single_type::<PlaybackConfig>(out_dir, &mut names)?;
    export_single_type::<PendingTick>(out_dir, &mut names)?;
    export_single_type::<TimerEffect>(out_dir, &mut names)?;
    export_single_type::<Segment>(out_dir, &mut names)?;
    export_single_type::<RenderWindow>(out_dir, &mut names)?;
    export_single_type::<Bookmark>(out_dir, &mut names)?;
    export_single_type::<HistorySummary>(out_dir, &mut names)?;
    export_single_type::<SettingsView>(out_dir, &mut names)?;
    export_single_type::<SettingsPatch>(out_dir, &mut names)?;
    export_single_type::<SessionSnapshot>(out_dir, &mut names)?;
    export_single_type::<SessionCommand>(out_dir, &mut names)?;
    export_single_type::<SessionEvent>(out_dir, &mut names)?;

    let index_content: String = names
        .iter()
        .map(|name| format!("export type {{ {name} }} from \"./{name}\";\n"))
        .collect();
    let index_path = out_dir.join("index.ts");
    fs::write(&index_path, index_content)
        .map_err(|err| format!("Failed to write {}: {err}", index_path.display()))?;
    info!(count = names.len(), out_dir = %out_dir.display(), "Exported TS bindings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_declarations_and_index() {
        let out_dir = std::env::temp_dir().join(format!("flashread-bindings-{}", std::process::id()));
        fs::create_dir_all(&out_dir).unwrap();
        fs::write(out_dir.join("Stale.ts"), "export type Stale = never;").unwrap();

        export_ts_bindings(&out_dir).unwrap();

        assert!(!out_dir.join("Stale.ts").exists());
        assert!(out_dir.join("SessionSnapshot.ts").exists());
        assert!(out_dir.join("SessionCommand.ts").exists());
        let index = fs::read_to_string(out_dir.join("index.ts")).unwrap();
        assert!(index.contains("export type { SessionEvent } from \"./SessionEvent\";"));
        assert_eq!(index.lines().count(), 14);

        fs::remove_dir_all(&out_dir).unwrap();
    }
}
