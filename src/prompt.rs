//! Console front-ends for picking a version.
//!
//! Every front-end numbers the versions from 1 and reserves 0 for exit.

use std::io::{self, BufRead, Write};

use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use owo_colors::OwoColorize;

use crate::error::{Result, SwitchError};
use crate::switcher::{Selection, Selector};
use crate::versions::VersionEntry;

const EXIT_ITEM: &str = "Exit";

/// Turns a menu number into a selection; 0 means exit.
pub fn from_menu_number(number: usize) -> Selection {
    match number {
        0 => Selection::Cancel,
        n => Selection::Index(n - 1),
    }
}

fn menu_line(entry: &VersionEntry) -> String {
    format!("{} \t\t {}", entry.label, entry.path)
}

/// Arrow-key menu. Esc or `q` cancels.
#[derive(Debug, Default)]
pub struct MenuSelector;

impl Selector for MenuSelector {
    fn select(&mut self, versions: &[VersionEntry], _: Option<&str>) -> Result<Selection> {
        let items: Vec<String> = std::iter::once(EXIT_ITEM.to_string())
            .chain(versions.iter().map(menu_line))
            .collect();
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Please select a JDK version")
            .items(&items)
            .default(0)
            .interact_opt();
        menu_selection(choice)
    }
}

/// Esc, `q` and an interrupted read all mean exit.
fn menu_selection(
    choice: std::result::Result<Option<usize>, dialoguer::Error>,
) -> Result<Selection> {
    match choice {
        Ok(choice) => Ok(choice.map_or(Selection::Cancel, from_menu_number)),
        Err(dialoguer::Error::IO(err)) if err.kind() == io::ErrorKind::Interrupted => {
            Ok(Selection::Cancel)
        }
        Err(err) => Err(err.into()),
    }
}

/// Numbered list read from a line of input.
pub struct TypedSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TypedSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Selector for TypedSelector<R, W> {
    fn select(&mut self, versions: &[VersionEntry], _: Option<&str>) -> Result<Selection> {
        writeln!(self.output, "Please select a JDK version:")?;
        writeln!(self.output, "0\t: {EXIT_ITEM}")?;
        for (index, entry) in versions.iter().enumerate() {
            writeln!(self.output, "{}:\t\t {}", index + 1, menu_line(entry))?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Selection::Cancel);
        }
        let line = line.trim();
        line.parse::<usize>()
            .map(from_menu_number)
            .map_err(|_| SwitchError::InvalidSelection(format!("{line:?} is not a number")))
    }
}

/// Choice given up front on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl Selector for FixedSelector {
    fn select(&mut self, _: &[VersionEntry], _: Option<&str>) -> Result<Selection> {
        Ok(from_menu_number(self.0))
    }
}

pub fn print_banner<W: Write>(
    out: &mut W,
    prefix: &str,
    home_var: &str,
    current_home: Option<&str>,
    color: bool,
) -> io::Result<()> {
    let rule = "*".repeat(50);
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "1. JDKs installed through their installers are found automatically."
    )?;
    writeln!(
        out,
        "2. To add one manually, create a system environment variable named {prefix}<version> holding its path."
    )?;
    writeln!(
        out,
        "3. Keep `%{home_var}%\\bin` at the top of the system `Path` variable."
    )?;
    writeln!(out, "{rule}")?;

    let current = format!("Current JDK Version: {}", current_home.unwrap_or("(not set)"));
    if color {
        writeln!(out, "{}", current.green())
    } else {
        writeln!(out, "{current}")
    }
}

pub fn print_versions<W: Write>(out: &mut W, versions: &[VersionEntry]) -> io::Result<()> {
    for (index, entry) in versions.iter().enumerate() {
        writeln!(out, "{}:\t\t {}", index + 1, menu_line(entry))?;
    }
    Ok(())
}
