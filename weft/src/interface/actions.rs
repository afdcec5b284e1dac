//! The three composable actions: Load, Tangle, Weave.
//!
//! Each action reads the shared [`Context`] and returns a short
//! human-readable summary. Drivers compose them in order: Load first, then
//! Tangle, Weave, or both against the same web.

use std::path::Path;

use crate::config::{find_template_set, load_template_set};
use crate::errors::Result;
use crate::io::update_file;
use crate::model::Web;
use crate::readers::load_web;
use crate::tangle::tangle_web;
use crate::weave::{weave_web, TemplateSet};

use super::context::Context;

/// Loads a WEB file into a fully resolved [`Web`].
pub fn load(ctx: &Context, web_path: &Path) -> Result<(Web, String)> {
    let resolved = ctx.resolve_path(web_path);
    tracing::info!("loading {}", resolved.display());

    let web = load_web(&resolved, &ctx.config.reader_options())?;
    let summary = format!("loaded {} chunk(s) from {}", web.len(), resolved.display());
    Ok((web, summary))
}

/// Tangles every output file of the web.
pub fn tangle(ctx: &Context, web: &Web) -> Result<String> {
    let summary = tangle_web(web, &ctx.output_dir(), &ctx.config.tangle_options())?;
    Ok(summary.describe())
}

/// Weaves the document through the configured template set.
pub fn weave(ctx: &Context, web: &Web) -> Result<String> {
    let templates = resolve_template_set(ctx)?;
    let content = weave_web(web, &templates, ctx.config.reference_style)?;

    let stem = web
        .source()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "web".to_string());
    let target = ctx
        .output_dir()
        .join(format!("{}.{}", stem, templates.extension));

    let written = update_file(&target, &content)?;
    if written {
        tracing::info!("wrote {}", target.display());
    }
    Ok(format!(
        "wove {} ({})",
        target.display(),
        if written { "written" } else { "unchanged" }
    ))
}

/// Looks up the configured template set: a built-in name, or a TOML file
/// resolved against the base directory.
fn resolve_template_set(ctx: &Context) -> Result<TemplateSet> {
    let spec = &ctx.config.templates;
    if let Some(set) = find_template_set(spec) {
        return Ok(set);
    }
    let path = ctx.resolve_path(Path::new(spec));
    load_template_set(&path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::tempdir;

    fn context_for(dir: &Path) -> Context {
        Context::new(Config::default(), dir.to_path_buf())
    }

    #[test]
    fn test_load_then_tangle() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("doc.w"),
            "@o out.py @{def f():\n    @<body@>\n@}\n@d body @{x = 1\ny = 2@}\n",
        )
        .unwrap();

        let ctx = context_for(dir.path());
        let (web, summary) = load(&ctx, Path::new("doc.w")).unwrap();
        assert!(summary.contains("loaded 2 chunk(s)"));

        let summary = tangle(&ctx, &web).unwrap();
        assert!(summary.contains("1 written"));

        let tangled = fs::read_to_string(dir.path().join("out.py")).unwrap();
        assert_eq!(tangled, "def f():\n    x = 1\n    y = 2\n");
    }

    #[test]
    fn test_weave_writes_document_named_after_web() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("doc.w"), "Some prose.\n@d m @{x@}\n").unwrap();

        let ctx = context_for(dir.path());
        let (web, _) = load(&ctx, Path::new("doc.w")).unwrap();
        let summary = weave(&ctx, &web).unwrap();
        assert!(summary.contains("doc.rst"));

        let woven = fs::read_to_string(dir.path().join("doc.rst")).unwrap();
        assert!(woven.contains("Some prose."));
        assert!(woven.contains("m (2)"));
    }

    #[test]
    fn test_tangle_and_weave_share_one_load() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("doc.w"), "@o out.txt @{hello@}\n").unwrap();

        let ctx = context_for(dir.path());
        let (web, _) = load(&ctx, Path::new("doc.w")).unwrap();

        tangle(&ctx, &web).unwrap();
        weave(&ctx, &web).unwrap();

        assert!(dir.path().join("out.txt").exists());
        assert!(dir.path().join("doc.rst").exists());
    }

    #[test]
    fn test_output_dir_is_honored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("doc.w"), "@o out.txt @{x@}\n").unwrap();

        let mut config = Config::default();
        config.output_dir = Some("gen".into());
        let ctx = Context::new(config, dir.path().to_path_buf());

        let (web, _) = load(&ctx, Path::new("doc.w")).unwrap();
        tangle(&ctx, &web).unwrap();

        assert!(dir.path().join("gen/out.txt").exists());
    }

    #[test]
    fn test_unknown_template_set_is_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("doc.w"), "prose\n").unwrap();

        let mut config = Config::default();
        config.templates = "nonexistent".into();
        let ctx = Context::new(config, dir.path().to_path_buf());

        let (web, _) = load(&ctx, Path::new("doc.w")).unwrap();
        assert!(weave(&ctx, &web).is_err());
    }
}
