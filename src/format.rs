use crate::{
    Res,
    cli::OutputFormat,
    error::Error,
    git::status::{StatusKind, StatusSnapshot},
};
use std::iter;

pub fn format_status(status: &StatusSnapshot, format: OutputFormat) -> Res<String> {
    match format {
        OutputFormat::Short => Ok(format_short(status)),
        OutputFormat::Toml => toml::to_string(status).map_err(Error::SerializeToml),
    }
}

fn format_short(status: &StatusSnapshot) -> String {
    let local = status.local_branch.as_deref().unwrap_or("HEAD");
    let branch = match &status.remote_branch {
        Some(remote) => format!(
            "On {local}, tracking {remote} ({})",
            divergence(status.ahead, status.behind)
        ),
        None => format!("On {local}"),
    };

    let entries = status.entries.iter().map(|entry| {
        let kind = entry.status.to_string();
        match (&entry.status, &entry.original_path) {
            (StatusKind::Renamed, Some(original)) => {
                format!("{:<10} {} -> {}", kind, original, entry.path)
            }
            _ => format!("{:<10} {}", kind, entry.path),
        }
    });

    let clean = status.is_clean().then(|| "Working tree clean".to_string());

    iter::once(branch)
        .chain(clean)
        .chain(entries)
        .map(|line| line + "\n")
        .collect()
}

fn divergence(ahead: u32, behind: u32) -> String {
    match (ahead, behind) {
        (0, 0) => "up to date".to_string(),
        (ahead, 0) => format!("ahead {ahead}"),
        (0, behind) => format!("behind {behind}"),
        (ahead, behind) => format!("ahead {ahead}, behind {behind}"),
    }
}
