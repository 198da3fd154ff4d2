//! Subcommand handlers.
//!
//! Each handler opens the vault on the configured storage file, performs one
//! operation and writes user-facing output to `out`.

use anyhow::{Context, Result};
use cattypass_core::{
    generate_password, Config, CredentialRecord, FileDownloader, FileStorage, Listing,
    PasswordVault, VaultError,
};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::Commands;

const MASKED_PASSWORD: &str = "••••••••";

/// Execute the parsed CLI command.
pub async fn execute<W: Write>(command: Commands, config: &Config, out: &mut W) -> Result<()> {
    let vault = PasswordVault::new(FileStorage::new(&config.storage_path));

    match command {
        Commands::Generate { length } => {
            cmd_generate(length.unwrap_or(config.password_length), out)
        }
        Commands::Save {
            site,
            username,
            password,
            generate,
            note,
        } => {
            let password = if generate {
                generate_password(config.password_length)
            } else {
                password.unwrap_or_default()
            };
            cmd_save(&vault, &site, CredentialRecord::new(username, password, note), out).await
        }
        Commands::Edit {
            site,
            username,
            password,
            note,
        } => cmd_edit(&vault, &site, username, password, note, out).await,
        Commands::Delete { site } => cmd_delete(&vault, &site, out).await,
        Commands::List { show_passwords } => {
            cmd_list(&vault, show_passwords || config.show_passwords, out).await
        }
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| config.export_dir.clone());
            cmd_export(&vault, dir, out).await
        }
        Commands::Import { file } => cmd_import(&vault, &file, out).await,
    }
}

fn cmd_generate<W: Write>(length: usize, out: &mut W) -> Result<()> {
    writeln!(out, "{}", generate_password(length))?;
    Ok(())
}

async fn cmd_save<W: Write>(
    vault: &PasswordVault<FileStorage>,
    site: &str,
    record: CredentialRecord,
    out: &mut W,
) -> Result<()> {
    vault.upsert(site, record).await?;
    writeln!(out, "Password for \"{}\" saved!", site.trim())?;
    Ok(())
}

async fn cmd_edit<W: Write>(
    vault: &PasswordVault<FileStorage>,
    site: &str,
    username: Option<String>,
    password: Option<String>,
    note: Option<String>,
    out: &mut W,
) -> Result<()> {
    let Some(current) = vault.get(site).await? else {
        return Err(VaultError::Validation(format!("No saved password for \"{site}\".")).into());
    };

    let record = CredentialRecord {
        username: username.unwrap_or(current.username),
        password: password.unwrap_or(current.password),
        note: note.unwrap_or(current.note),
    };
    vault.edit(site, record).await?;
    writeln!(out, "Password for \"{site}\" updated.")?;
    Ok(())
}

async fn cmd_delete<W: Write>(
    vault: &PasswordVault<FileStorage>,
    site: &str,
    out: &mut W,
) -> Result<()> {
    if vault.delete(site).await? {
        writeln!(out, "Deleted password for \"{site}\".")?;
    } else {
        writeln!(out, "No saved password for \"{site}\".")?;
    }
    Ok(())
}

async fn cmd_list<W: Write>(
    vault: &PasswordVault<FileStorage>,
    show_passwords: bool,
    out: &mut W,
) -> Result<()> {
    let records = match vault.list().await? {
        Listing::Empty => {
            writeln!(out, "No saved passwords yet.")?;
            return Ok(());
        }
        Listing::Records(records) => records,
    };

    for (site, record) in records {
        let password = if show_passwords {
            record.password.as_str()
        } else {
            MASKED_PASSWORD
        };
        writeln!(out, "{site}")?;
        writeln!(out, "  Username: {}", record.username)?;
        writeln!(out, "  Password: {password}")?;
        writeln!(out, "  Note: {}", record.note)?;
    }
    Ok(())
}

async fn cmd_export<W: Write>(
    vault: &PasswordVault<FileStorage>,
    dir: PathBuf,
    out: &mut W,
) -> Result<()> {
    let path = vault.export(&FileDownloader::new(dir)).await?;
    writeln!(out, "Exported passwords to {}", path.display())?;
    Ok(())
}

async fn cmd_import<W: Write>(
    vault: &PasswordVault<FileStorage>,
    file: &Path,
    out: &mut W,
) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;

    let count = vault.import_csv(&bytes).await?;
    writeln!(out, "Imported {count} passwords successfully!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cattypass_core::EXPORT_FILENAME;

    struct Fixture {
        _dir: tempfile::TempDir,
        config: Config,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage_path: dir.path().join("storage.json"),
            export_dir: dir.path().join("exports"),
            password_length: 20,
            show_passwords: false,
        };
        Fixture { _dir: dir, config }
    }

    fn run(command: Commands, config: &Config) -> Result<String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let mut out = Vec::new();
        runtime.block_on(execute(command, config, &mut out))?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn save(config: &Config, site: &str, password: &str) {
        run(
            Commands::Save {
                site: site.to_string(),
                username: "user".to_string(),
                password: Some(password.to_string()),
                generate: false,
                note: String::new(),
            },
            config,
        )
        .unwrap();
    }

    #[test]
    fn list_on_empty_store_says_so() {
        let fx = fixture();
        let out = run(Commands::List { show_passwords: false }, &fx.config).unwrap();
        assert_eq!(out, "No saved passwords yet.\n");
    }

    #[test]
    fn save_then_list_masks_password_by_default() {
        let fx = fixture();
        save(&fx.config, "mail", "secret");

        let out = run(Commands::List { show_passwords: false }, &fx.config).unwrap();
        assert!(out.contains("mail"));
        assert!(!out.contains("secret"));

        let out = run(Commands::List { show_passwords: true }, &fx.config).unwrap();
        assert!(out.contains("Password: secret"));
    }

    #[test]
    fn save_with_generate_uses_configured_length() {
        let fx = fixture();
        run(
            Commands::Save {
                site: "gen".to_string(),
                username: String::new(),
                password: None,
                generate: true,
                note: String::new(),
            },
            &fx.config,
        )
        .unwrap();

        let out = run(Commands::List { show_passwords: true }, &fx.config).unwrap();
        let line = out.lines().find(|l| l.contains("Password:")).unwrap();
        let password = line.trim().trim_start_matches("Password: ");
        assert_eq!(password.chars().count(), 20);
    }

    #[test]
    fn save_without_password_is_rejected() {
        let fx = fixture();
        let err = run(
            Commands::Save {
                site: "site".to_string(),
                username: String::new(),
                password: None,
                generate: false,
                note: String::new(),
            },
            &fx.config,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VaultError>(),
            Some(VaultError::Validation(_))
        ));
    }

    #[test]
    fn edit_keeps_omitted_fields() {
        let fx = fixture();
        save(&fx.config, "site", "old");

        run(
            Commands::Edit {
                site: "site".to_string(),
                username: None,
                password: Some("new".to_string()),
                note: Some("changed".to_string()),
            },
            &fx.config,
        )
        .unwrap();

        let out = run(Commands::List { show_passwords: true }, &fx.config).unwrap();
        assert!(out.contains("Username: user"));
        assert!(out.contains("Password: new"));
        assert!(out.contains("Note: changed"));
    }

    #[test]
    fn edit_of_unknown_site_fails() {
        let fx = fixture();
        let result = run(
            Commands::Edit {
                site: "ghost".to_string(),
                username: None,
                password: Some("p".to_string()),
                note: None,
            },
            &fx.config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn delete_reports_absent_site() {
        let fx = fixture();
        save(&fx.config, "site", "p");

        let out = run(Commands::Delete { site: "site".to_string() }, &fx.config).unwrap();
        assert!(out.starts_with("Deleted"));
        let out = run(Commands::Delete { site: "site".to_string() }, &fx.config).unwrap();
        assert!(out.starts_with("No saved password"));
    }

    #[test]
    fn export_writes_file_and_empty_export_fails() {
        let fx = fixture();
        let err = run(Commands::Export { dir: None }, &fx.config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VaultError>(),
            Some(VaultError::Export(_))
        ));
        assert!(!fx.config.export_dir.join(EXPORT_FILENAME).exists());

        save(&fx.config, "site", "p");
        run(Commands::Export { dir: None }, &fx.config).unwrap();
        assert!(fx.config.export_dir.join(EXPORT_FILENAME).exists());
    }

    #[test]
    fn import_merges_csv_file() {
        let fx = fixture();
        save(&fx.config, "kept", "p");
        let csv = fx.config.export_dir.with_file_name("import.csv");
        std::fs::write(&csv, "name,url,username,password,note\nnew,x,me,pw,a note\n").unwrap();

        let out = run(Commands::Import { file: csv }, &fx.config).unwrap();
        assert_eq!(out, "Imported 1 passwords successfully!\n");

        let out = run(Commands::List { show_passwords: true }, &fx.config).unwrap();
        assert!(out.contains("kept"));
        assert!(out.contains("Note: a note"));
    }

    #[test]
    fn generate_prints_requested_length() {
        let fx = fixture();
        let out = run(Commands::Generate { length: Some(8) }, &fx.config).unwrap();
        assert_eq!(out.trim_end_matches('\n').chars().count(), 8);
    }
}
