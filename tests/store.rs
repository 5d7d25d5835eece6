#[cfg(test)]
mod tests {
    use soma_rail::libs::store::{Preferences, CHANNEL_KEY, PREFERENCES_FILE_NAME, VOLUME_KEY};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StoreTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("nested").join(PREFERENCES_FILE_NAME);
            StoreTestContext { _temp_dir: temp_dir, path }
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_empty_store_uses_defaults(ctx: &mut StoreTestContext) {
        let prefs = Preferences::open_at(ctx.path.clone());
        assert_eq!(prefs.get::<f64>(VOLUME_KEY), None);
        assert_eq!(prefs.get_or(VOLUME_KEY, 0.7), 0.7);
        assert!(!ctx.path.exists());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_values_survive_reopen(ctx: &mut StoreTestContext) {
        let mut prefs = Preferences::open_at(ctx.path.clone());
        prefs.set(VOLUME_KEY, 0.45).unwrap();
        prefs.set(CHANNEL_KEY, "dronezone").unwrap();

        let reopened = Preferences::open_at(ctx.path.clone());
        assert_eq!(reopened.get::<f64>(VOLUME_KEY), Some(0.45));
        assert_eq!(reopened.get::<String>(CHANNEL_KEY), Some("dronezone".to_string()));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_wrong_shape_reads_as_missing(ctx: &mut StoreTestContext) {
        let mut prefs = Preferences::open_at(ctx.path.clone());
        prefs.set(VOLUME_KEY, "loud").unwrap();

        assert_eq!(prefs.get::<f64>(VOLUME_KEY), None);
        assert_eq!(prefs.get_or(VOLUME_KEY, 0.7), 0.7);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_corrupt_file_reads_as_empty(ctx: &mut StoreTestContext) {
        std::fs::create_dir_all(ctx.path.parent().unwrap()).unwrap();
        std::fs::write(&ctx.path, "[1, 2").unwrap();

        let mut prefs = Preferences::open_at(ctx.path.clone());
        assert_eq!(prefs.get::<f64>(VOLUME_KEY), None);

        prefs.set(VOLUME_KEY, 0.2).unwrap();
        let reopened = Preferences::open_at(ctx.path.clone());
        assert_eq!(reopened.get::<f64>(VOLUME_KEY), Some(0.2));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_remove_key(ctx: &mut StoreTestContext) {
        let mut prefs = Preferences::open_at(ctx.path.clone());
        prefs.set(CHANNEL_KEY, "groovesalad").unwrap();
        prefs.remove(CHANNEL_KEY).unwrap();
        prefs.remove(CHANNEL_KEY).unwrap();

        let reopened = Preferences::open_at(ctx.path.clone());
        assert_eq!(reopened.get::<String>(CHANNEL_KEY), None);
    }
}
