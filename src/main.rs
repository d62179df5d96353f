#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("This application is Windows-only.");
}

#[cfg(target_os = "windows")]
mod app {
    use std::io::{self, Write};
    use std::process::ExitCode;

    use anyhow::{Context, Result};
    use clap::Parser;
    use owo_colors::OwoColorize;
    use tracing::{info, warn};

    use jdk_switcher_native::cli::Cli;
    use jdk_switcher_native::environment::PATH_VAR;
    use jdk_switcher_native::platform;
    use jdk_switcher_native::prompt::{self, FixedSelector, MenuSelector, TypedSelector};
    use jdk_switcher_native::store::registry::RegistryStore;
    use jdk_switcher_native::store::StoreError;
    use jdk_switcher_native::switcher::{self, Outcome, Selection, Selector};
    use jdk_switcher_native::{SwitchError, VersionEntry};

    /// Prints the banner, then hands over to the real front-end.
    struct WithBanner {
        inner: Box<dyn Selector>,
        prefix: String,
        home_var: String,
        color: bool,
        quiet: bool,
    }

    impl Selector for WithBanner {
        fn select(
            &mut self,
            versions: &[VersionEntry],
            current_home: Option<&str>,
        ) -> jdk_switcher_native::Result<Selection> {
            if !self.quiet {
                prompt::print_banner(
                    &mut io::stdout(),
                    &self.prefix,
                    &self.home_var,
                    current_home,
                    self.color,
                )?;
            }
            self.inner.select(versions, current_home)
        }
    }

    pub fn run() -> Result<ExitCode> {
        let cli = Cli::parse();

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(cli.log_level().into()),
            )
            .with_target(false)
            .with_writer(io::stderr)
            .init();

        let store = RegistryStore;
        let color = console::colors_enabled();

        if cli.list {
            let versions = switcher::discover(&store, &cli.prefix);
            if versions.is_empty() {
                let err = SwitchError::NoVersionsFound {
                    prefix: cli.prefix.clone(),
                };
                report_error(&err, color);
                return Ok(ExitCode::FAILURE);
            }
            prompt::print_versions(&mut io::stdout(), versions.entries())
                .context("failed to print versions")?;
            return Ok(ExitCode::SUCCESS);
        }

        if cli.writes() && !cli.no_elevate && !platform::is_admin() {
            match platform::restart_as_admin() {
                Ok(()) => {
                    info!("relaunched elevated");
                    return Ok(ExitCode::SUCCESS);
                }
                Err(err) => warn!("failed to restart as Administrator: {err:#}"),
            }
        }

        let inner: Box<dyn Selector> = match cli.select {
            Some(number) => Box::new(FixedSelector(number)),
            None if cli.plain || !console::user_attended() => {
                Box::new(TypedSelector::new(io::stdin().lock(), io::stdout()))
            }
            None => Box::new(MenuSelector),
        };
        let mut selector = WithBanner {
            inner,
            prefix: cli.prefix.clone(),
            home_var: cli.home_var.clone(),
            color,
            quiet: cli.quiet,
        };

        let settings = cli.settings();
        match switcher::run(&store, &mut selector, &settings) {
            Ok(outcome) => report_outcome(&outcome, &settings.home_var, color),
            Err(err) => {
                report_error(&err, color);
                Ok(ExitCode::FAILURE)
            }
        }
    }

    fn report_outcome(outcome: &Outcome, home_var: &str, color: bool) -> Result<ExitCode> {
        let mut out = io::stdout();
        match outcome {
            Outcome::Cancelled => {
                writeln!(out, "Exiting the application as per user request.")?;
                Ok(ExitCode::SUCCESS)
            }
            Outcome::Planned { entry, change } => {
                writeln!(out, "Using {} ({})", entry.path, entry.label)?;
                writeln!(out, "Would set {home_var} to {}", change.home)?;
                writeln!(out, "Would set {PATH_VAR} to {}", change.path.data)?;
                Ok(ExitCode::SUCCESS)
            }
            Outcome::Applied {
                entry,
                change,
                report,
            } => {
                writeln!(out, "Using {}", entry.path)?;
                if report.home.is_ok() {
                    writeln!(out, "Set {home_var} to {} successfully.", change.home)?;
                }
                if report.path.is_ok() {
                    writeln!(out, "Updated {PATH_VAR} successfully.")?;
                }
                for (variable, err) in report.failures() {
                    let message = format!("Failed to update {variable}: {err}");
                    if color {
                        eprintln!("{}", message.red());
                    } else {
                        eprintln!("{message}");
                    }
                }

                if report.is_complete() {
                    writeln!(
                        out,
                        "Changes applied successfully. You may need to restart your terminal or log out and log back in for changes to take effect."
                    )?;
                    Ok(ExitCode::SUCCESS)
                } else {
                    if report.any_written() {
                        eprintln!(
                            "{home_var} and {PATH_VAR} may now disagree; fix the failed variable and run again."
                        );
                    }
                    let denied = report
                        .failures()
                        .iter()
                        .any(|(_, err)| matches!(err, StoreError::AccessDenied(_)));
                    if denied {
                        eprintln!("\n💡 Run from an elevated (Administrator) prompt.");
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }

    fn report_error(err: &SwitchError, color: bool) {
        let message = format!("Error: {err}");
        if color {
            eprintln!("{}", message.red());
        } else {
            eprintln!("{message}");
        }
        if let Some(suggestion) = err.suggestion() {
            eprintln!("\n💡 {suggestion}");
        }
    }
}

#[cfg(target_os = "windows")]
fn main() -> std::process::ExitCode {
    match app::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::ExitCode::FAILURE
        }
    }
}
