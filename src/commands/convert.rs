use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

use crate::{
    ConvertArgs,
    config::Config,
    convert::{Converter, FilesWriter},
};

pub async fn run(args: &ConvertArgs) -> Result<(), anyhow::Error> {
    let mut config = Config::load_from_arg(args.config_file.as_deref())?;

    // Command line flags win over the config file
    if let Some(format) = &args.to {
        config.export_format = format.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = Some(output_dir.clone());
    }

    let converter = Converter::new(config)?;

    let mut written: HashSet<PathBuf> = HashSet::new();
    for notebook_path in &args.notebooks {
        let mut conversion = converter
            .convert_file(notebook_path)
            .await
            .with_context(|| format!("failed to convert {}", notebook_path.display()))?;

        if args.stdout {
            print!("{}", conversion.output);
            continue;
        }

        let output_dir = match &converter.config().output_dir {
            Some(dir) => dir.clone(),
            None => notebook_path
                .parent()
                .unwrap_or(Path::new("."))
                .to_path_buf(),
        };

        // Never replace the source notebook (`--to notebook` without `-o`)
        if is_same_file(
            &output_dir.join(conversion.resources.output_file_name()),
            notebook_path,
        )
        .await
        {
            conversion.resources.unique_key.push_str(".nbconvert");
        }

        let document_path = output_dir.join(conversion.resources.output_file_name());
        if written.contains(&document_path) {
            bail!(
                "{} would overwrite {} written earlier in this run",
                notebook_path.display(),
                document_path.display()
            );
        }

        let document_path = FilesWriter::new(output_dir).write(&conversion).await?;
        tracing::info!(
            notebook = %notebook_path.display(),
            output = %document_path.display(),
            resources = conversion.resources.outputs.len(),
            "converted notebook"
        );
        written.insert(document_path);
    }

    if !args.stdout {
        println!("Converted {} notebook(s)", written.len());
    }

    Ok(())
}

/// Whether both paths name the same existing file.
async fn is_same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTEBOOK: &str = r##"{
  "cells": [
    {"cell_type": "markdown", "metadata": {}, "source": "Intro"},
    {"cell_type": "markdown", "metadata": {"tags": ["remove_cell"]}, "source": "Draft notes"}
  ],
  "metadata": {"blog": {"title": "Post"}},
  "nbformat": 4,
  "nbformat_minor": 5
}"##;

    fn args(notebook: &Path, output_dir: &Path) -> ConvertArgs {
        ConvertArgs {
            notebooks: vec![notebook.to_path_buf()],
            config_file: None,
            output_dir: Some(output_dir.to_path_buf()),
            to: None,
            stdout: false,
        }
    }

    #[tokio::test]
    async fn test_convert_writes_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let notebook = dir.path().join("post.ipynb");
        tokio::fs::write(&notebook, NOTEBOOK).await.unwrap();
        let out = dir.path().join("site");

        run(&args(&notebook, &out)).await.unwrap();

        let markdown = std::fs::read_to_string(out.join("post.md")).unwrap();
        assert_eq!(markdown, "---\ntitle: Post\n\n---\n\nIntro\n");
    }

    #[tokio::test]
    async fn test_convert_to_notebook_format() {
        let dir = tempfile::tempdir().unwrap();
        let notebook = dir.path().join("post.ipynb");
        tokio::fs::write(&notebook, NOTEBOOK).await.unwrap();
        let out = dir.path().join("site");

        let mut args = args(&notebook, &out);
        args.to = Some("notebook".to_string());
        run(&args).await.unwrap();

        let exported = std::fs::read_to_string(out.join("post.ipynb")).unwrap();
        assert!(exported.contains("title: Post"));
        assert!(!exported.contains("Draft notes"));
    }

    #[tokio::test]
    async fn test_default_output_dir_is_notebook_dir() {
        let dir = tempfile::tempdir().unwrap();
        let notebook = dir.path().join("post.ipynb");
        tokio::fs::write(&notebook, NOTEBOOK).await.unwrap();

        let mut args = args(&notebook, dir.path());
        args.output_dir = None;
        run(&args).await.unwrap();

        let markdown = std::fs::read_to_string(dir.path().join("post.md")).unwrap();
        assert_eq!(markdown, "---\ntitle: Post\n\n---\n\nIntro\n");
        assert_eq!(std::fs::read_to_string(&notebook).unwrap(), NOTEBOOK);
    }

    #[tokio::test]
    async fn test_notebook_format_keeps_source_notebook() {
        let dir = tempfile::tempdir().unwrap();
        let notebook = dir.path().join("post.ipynb");
        tokio::fs::write(&notebook, NOTEBOOK).await.unwrap();

        let mut args = args(&notebook, dir.path());
        args.output_dir = None;
        args.to = Some("notebook".to_string());
        run(&args).await.unwrap();

        assert_eq!(std::fs::read_to_string(&notebook).unwrap(), NOTEBOOK);
        let exported =
            std::fs::read_to_string(dir.path().join("post.nbconvert.ipynb")).unwrap();
        assert!(exported.contains("title: Post"));
        assert!(!exported.contains("Draft notes"));

        // A second run leaves the source alone again
        run(&args).await.unwrap();
        assert_eq!(std::fs::read_to_string(&notebook).unwrap(), NOTEBOOK);
    }

    #[tokio::test]
    async fn test_notebook_format_into_own_dir_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let notebook = dir.path().join("post.ipynb");
        tokio::fs::write(&notebook, NOTEBOOK).await.unwrap();

        let mut args = args(&notebook, dir.path());
        args.to = Some("notebook".to_string());
        run(&args).await.unwrap();

        assert_eq!(std::fs::read_to_string(&notebook).unwrap(), NOTEBOOK);
        assert!(dir.path().join("post.nbconvert.ipynb").exists());
    }

    #[tokio::test]
    async fn test_shared_stem_in_output_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            tokio::fs::create_dir_all(dir.path().join(sub)).await.unwrap();
        }
        let first = dir.path().join("a/post.ipynb");
        let second = dir.path().join("b/post.ipynb");
        tokio::fs::write(&first, NOTEBOOK).await.unwrap();
        tokio::fs::write(&second, NOTEBOOK.replace("Intro", "Other"))
            .await
            .unwrap();
        let out = dir.path().join("site");

        let mut args = args(&first, &out);
        args.notebooks.push(second);
        let err = run(&args).await.unwrap_err();

        assert!(err.to_string().contains("written earlier in this run"));
        let markdown = std::fs::read_to_string(out.join("post.md")).unwrap();
        assert!(markdown.contains("Intro"));
    }

    #[tokio::test]
    async fn test_missing_metadata_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let notebook = dir.path().join("bare.ipynb");
        tokio::fs::write(
            &notebook,
            r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#,
        )
        .await
        .unwrap();
        let out = dir.path().join("site");

        let err = run(&args(&notebook, &out)).await.unwrap_err();
        assert!(format!("{err:#}").contains("no 'blog' entry"));
        assert!(!out.join("bare.md").exists());
    }
}
