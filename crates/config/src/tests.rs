use crate::AppConfig;
use figment::Jail;

#[test]
fn test_empty_config_dir_uses_defaults() {
    Jail::expect_with(|_jail| {
        let config = AppConfig::load(".").map_err(|e| e.to_string())?;
        assert_eq!(config.app_name, "hotel-service");
        assert!(config.is_development());
        assert_eq!(config.server.grpc_port, 50052);
        assert_eq!(config.server.rest_port, 5002);
        assert_eq!(config.checkout.processing_delay_ms, 1000);
        assert_eq!(config.chat.think_time_ms, 500);
        assert_eq!(config.chat.sender, "suporte");
        assert_eq!(config.chat.domain_tag, "hotel");
        assert!(config.chat.keywords.hospitality.contains(&"quarto".to_string()));
        assert!(config.inventory.seed.is_none());
        Ok(())
    });
}

#[test]
fn test_file_and_env_layering() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "default.toml",
            r#"
                app_name = "hoteis"

                [server]
                grpc_port = 6000

                [chat]
                think_time_ms = 50

                [inventory]
                seed = 42
            "#,
        )?;
        jail.create_file(
            "production.toml",
            r#"
                app_env = "production"

                [telemetry]
                log_level = "warn"
            "#,
        )?;
        jail.set_env("APP_ENV", "production");
        jail.set_env("APP_SERVER__GRPC_PORT", "7000");

        let config = AppConfig::load(".").map_err(|e| e.to_string())?;
        assert_eq!(config.app_name, "hoteis");
        assert!(config.is_production());
        assert_eq!(config.telemetry.log_level, "warn");
        assert_eq!(config.server.grpc_port, 7000);
        // 未覆盖的字段保持默认值
        assert_eq!(config.server.metrics_port, 8001);
        assert_eq!(config.chat.think_time_ms, 50);
        assert_eq!(config.chat.sender, "suporte");
        assert_eq!(config.inventory.seed, Some(42));
        Ok(())
    });
}

#[test]
fn test_keyword_override_replaces_set() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "default.toml",
            r#"
                [chat.keywords]
                package = ["pacote", "bundle"]
            "#,
        )?;

        let config = AppConfig::load(".").map_err(|e| e.to_string())?;
        assert_eq!(config.chat.keywords.package, vec!["pacote", "bundle"]);
        assert!(config.chat.keywords.flight.contains(&"voo".to_string()));
        Ok(())
    });
}

#[test]
fn test_invalid_availability_rate_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "default.toml",
            r#"
                [search]
                availability_rate = 1.5
            "#,
        )?;

        assert!(AppConfig::load(".").is_err());
        Ok(())
    });
}
