//! Library integration tests.

use comfyup::ComfyupError;

#[test]
fn error_types_are_public() {
    let err = ComfyupError::IncompleteCheckout {
        path: "ComfyUI".into(),
    };
    assert!(err.to_string().contains("ComfyUI"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> comfyup::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use comfyup::cli::{Cli, Commands};

    let cli = Cli::parse_from(["comfyup", "status", "--checkout", "/srv/ComfyUI"]);
    assert!(matches!(cli.command, Some(Commands::Status)));
    assert_eq!(
        cli.overrides.checkout.as_deref(),
        Some(std::path::Path::new("/srv/ComfyUI"))
    );
}
