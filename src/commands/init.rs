use crate::{
    InitArgs,
    config::{Config, DEFAULT_CONFIG_FILE},
};

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    let config_file = path.join(DEFAULT_CONFIG_FILE);
    if config_file.exists() {
        return Err(anyhow::anyhow!(
            "Config file already exists: {config_file}",
            config_file = config_file.display()
        ));
    }

    let config_text = serde_yaml::to_string(&Config::default())?;
    tokio::fs::write(&config_file, config_text).await?;

    println!(
        "Created config file {config_file}",
        config_file = config_file.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            path: dir.path().join("blog"),
            create: true,
        };

        run(&args).await.unwrap();

        let config_file = args.path.join(DEFAULT_CONFIG_FILE);
        let config = Config::load_from_file(&config_file, true).unwrap();
        assert_eq!(config.export_format, "markdown");
        assert_eq!(config.tag_remove.remove_cell_tags, vec!["remove_cell"]);

        // A second run must not clobber the existing file
        assert!(run(&args).await.is_err());
    }

    #[tokio::test]
    async fn test_init_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            path: dir.path().join("missing"),
            create: false,
        };
        assert!(run(&args).await.is_err());
    }
}
