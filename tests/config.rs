// ABOUTME: Integration tests for configuration parsing and discovery.
// ABOUTME: Tests YAML parsing, defaults, validation, and command-line overrides.

use convoy::config::*;
use std::path::Path;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.command, "sls");
        assert_eq!(config.manifests.len(), DEFAULT_MANIFESTS.len());
        assert_eq!(config.concurrency, Concurrency::Parallel);
        assert!(!config.exit_on_failure);
        assert!(!config.rollback_on_failure);
        assert!(config.command_timeout.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
command: serverless
manifests:
  - serverless.yml
  - stack.yml
concurrency: sequential
exit_on_failure: true
rollback_on_failure: true
command_timeout: 15m
log_file: .convoy/deploy.log
hooks_dir: ops/hooks
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.command, "serverless");
        assert_eq!(config.manifests.head, "serverless.yml");
        assert_eq!(config.manifests.tail, vec!["stack.yml".to_string()]);
        assert_eq!(config.concurrency, Concurrency::Sequential);
        assert!(config.exit_on_failure);
        assert!(config.rollback_on_failure);
        assert_eq!(config.command_timeout, Some(Duration::from_secs(900)));

        let root = Path::new("/work");
        assert_eq!(
            config.log_file(root),
            Some(Path::new("/work/.convoy/deploy.log").to_path_buf())
        );
        assert_eq!(config.hooks_dir(root), Path::new("/work/ops/hooks"));
    }

    #[test]
    fn default_hooks_dir_is_under_convoy() {
        let config = Config::default();
        assert_eq!(
            config.hooks_dir(Path::new("/work")),
            Path::new("/work/.convoy/hooks")
        );
        assert!(config.log_file(Path::new("/work")).is_none());
    }
}

mod validation {
    use super::*;

    #[test]
    fn empty_manifest_list_is_rejected() {
        let err = Config::from_yaml("manifests: []\n").unwrap_err();
        assert!(err.to_string().contains("at least one manifest"));
    }

    #[test]
    fn manifest_with_path_is_rejected() {
        let err = Config::from_yaml("manifests: [\"api/serverless.yml\"]\n").unwrap_err();
        assert!(err.to_string().contains("invalid manifest file name"));
    }

    #[test]
    fn unknown_concurrency_is_rejected() {
        assert!(Config::from_yaml("concurrency: eventually\n").is_err());
    }

    #[test]
    fn bad_timeout_is_rejected() {
        assert!(Config::from_yaml("command_timeout: soon\n").is_err());
    }
}

mod discovery {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_means_defaults() {
        let temp = TempDir::new().unwrap();
        assert!(Config::find(temp.path()).is_none());
        let config = Config::discover(temp.path()).unwrap();
        assert_eq!(config.command, "sls");
    }

    #[test]
    fn finds_alternate_names() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILENAME_ALT),
            "command: ./node_modules/.bin/sls\n",
        )
        .unwrap();

        assert_eq!(
            Config::find(temp.path()),
            Some(temp.path().join(CONFIG_FILENAME_ALT))
        );
        assert_eq!(
            Config::discover(temp.path()).unwrap().command,
            "./node_modules/.bin/sls"
        );
    }

    #[test]
    fn init_template_parses() {
        let temp = TempDir::new().unwrap();
        init_config(temp.path(), false).unwrap();

        let config = Config::discover(temp.path()).unwrap();
        assert_eq!(config.command, "sls");
        assert_eq!(config.concurrency, Concurrency::Parallel);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        init_config(temp.path(), false).unwrap();

        assert!(init_config(temp.path(), false).is_err());
        assert!(init_config(temp.path(), true).is_ok());
    }
}

mod overrides {
    use super::*;

    #[test]
    fn switches_layer_over_file() {
        let config = Config::from_yaml("rollback_on_failure: true\n").unwrap();
        let run = config.run_config().with_overrides(RunOverrides {
            run_in_band: true,
            exit_on_failure: true,
            rollback_on_failure: false,
            verbose: true,
        });

        assert_eq!(run.concurrency, Concurrency::Sequential);
        assert!(run.exit_on_failure);
        assert!(run.rollback_on_failure);
        assert!(run.verbose);
    }
}
