//! Loading room templates from a directory of level files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use roomcrawl_core::{CellCoord, DungeonLayout, RoomTemplate, TemplatePool};
use tracing::info;

/// Extension of level files; anything else in the directory is ignored.
const LEVEL_EXTENSION: &str = "txt";

/// Loads every `*.txt` file in `dir` as a room template named after its file stem.
pub(crate) fn load_pool(dir: &Path) -> Result<TemplatePool> {
    let paths = level_paths(dir)?;
    let mut templates = Vec::with_capacity(paths.len());
    for path in &paths {
        templates.push(load_template(path)?);
    }

    let pool = TemplatePool::from_templates(templates)
        .with_context(|| format!("invalid level set in {}", dir.display()))?;
    info!(
        directory = %dir.display(),
        templates = paths.len(),
        regular = pool.regular().len(),
        "loaded levels"
    );
    Ok(pool)
}

fn level_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read level directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list level directory {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == LEVEL_EXTENSION) {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        bail!("no level files found in {}", dir.display());
    }
    paths.sort();
    Ok(paths)
}

fn load_template(path: &Path) -> Result<RoomTemplate> {
    let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
        bail!("level file {} has no usable name", path.display());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    RoomTemplate::parse(name, &contents)
        .with_context(|| format!("failed to parse level file {}", path.display()))
}

/// Grid of two-letter template abbreviations, one map row per line.
///
/// Empty cells print as two spaces so columns stay aligned.
pub(crate) fn render_layout(layout: &DungeonLayout) -> String {
    let side = layout.side();
    let mut output = String::new();
    for row in 0..side {
        let cells: Vec<String> = (0..side)
            .map(|column| {
                layout
                    .get(CellCoord::new(column, row))
                    .map_or_else(
                        || "  ".to_owned(),
                        |template| format!("{:<2}", template.abbreviation()),
                    )
            })
            .collect();
        output.push_str(&cells.join(" "));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn levels_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../levels")
    }

    #[test]
    fn bundled_levels_form_a_complete_pool() {
        let pool = load_pool(&levels_dir()).expect("bundled levels load");
        assert_eq!(pool.start().name(), "start");
        assert_eq!(pool.regular().len(), 9);
        assert!(pool.regular().iter().all(|template| template.columns() == 15));
    }

    #[test]
    fn missing_directory_reports_the_path() {
        let error = load_pool(Path::new("definitely/not/here")).expect_err("missing directory");
        assert!(format!("{error:#}").contains("definitely/not/here"));
    }

    #[test]
    fn layout_prints_abbreviations_on_a_grid() {
        let template = |name: &str| {
            Arc::new(RoomTemplate::parse(name, "0 1 2 3\n...\n").expect("valid template"))
        };
        let mut layout = DungeonLayout::new(2, CellCoord::new(0, 0));
        assert!(layout.place(CellCoord::new(0, 0), template("start")));
        assert!(layout.place(CellCoord::new(1, 1), template("x")));

        assert_eq!(render_layout(&layout), "st   \n   x \n");
    }
}
