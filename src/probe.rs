// src/probe.rs
//! Reports what the current platform offers: capabilities, modifier state
//! and optional font loads.

use std::fmt;
use std::path::PathBuf;

use laf_os_core::{GlyphProvider, KeyModifiers, System, SystemResult};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ProbeError {
    #[error("Missing value for {0}")]
    MissingValue(&'static str),

    #[error("Invalid number for {flag}: {value}")]
    InvalidNumber { flag: &'static str, value: String },

    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbeArgs {
    pub sheet: Option<PathBuf>,
    pub sheet_scale: u32,
    pub outline: Option<PathBuf>,
    pub outline_size: f32,
    pub activate: bool,
}

impl ProbeArgs {
    /// Parses `--sheet PATH`, `--scale N`, `--ttf PATH`, `--size PX` and
    /// `--activate`.
    pub fn parse<I>(args: I) -> Result<Self, ProbeError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = ProbeArgs {
            sheet_scale: 1,
            outline_size: 16.0,
            ..Default::default()
        };
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--sheet" => parsed.sheet = Some(value(&mut args, "--sheet")?.into()),
                "--ttf" => parsed.outline = Some(value(&mut args, "--ttf")?.into()),
                "--scale" => parsed.sheet_scale = number(&mut args, "--scale")?,
                "--size" => parsed.outline_size = number(&mut args, "--size")?,
                "--activate" => parsed.activate = true,
                _ => return Err(ProbeError::UnknownArgument(arg)),
            }
        }
        Ok(parsed)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, ProbeError> {
    args.next().ok_or(ProbeError::MissingValue(flag))
}

fn number<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<T, ProbeError> {
    let raw = value(args, flag)?;
    raw.parse()
        .map_err(|_| ProbeError::InvalidNumber { flag, value: raw })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub platform: &'static str,
    pub native_dialogs: bool,
    pub menus: bool,
    pub logger: bool,
    pub wintab: bool,
    pub modifiers: KeyModifiers,
    pub sheet_height: Option<f32>,
    pub outline_height: Option<f32>,
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "platform:       {}", self.platform)?;
        writeln!(f, "native dialogs: {}", yes_no(self.native_dialogs))?;
        writeln!(f, "menus:          {}", yes_no(self.menus))?;
        writeln!(f, "logger:         {}", yes_no(self.logger))?;
        writeln!(f, "wintab:         {}", yes_no(self.wintab))?;
        write!(f, "modifiers:      {:?}", self.modifiers)?;
        if let Some(height) = self.sheet_height {
            write!(f, "\nsheet font:     {height}px")?;
        }
        if let Some(height) = self.outline_height {
            write!(f, "\noutline font:   {height}px")?;
        }
        Ok(())
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Queries `system` and loads the fonts named in `args`.
pub fn run(system: &dyn System, args: &ProbeArgs) -> SystemResult<ProbeReport> {
    if args.activate {
        system.activate_app();
        system.finish_launching();
    }

    tracing::debug!(?args, "Running platform probe");
    let sheet_height = match &args.sheet {
        Some(path) => Some(system.load_sprite_sheet_font(path, args.sheet_scale)?.height()),
        None => None,
    };
    let outline_height = match &args.outline {
        Some(path) => Some(system.load_true_type_font(path, args.outline_size)?.height()),
        None => None,
    };

    Ok(ProbeReport {
        platform: system.platform_name(),
        native_dialogs: system.native_dialogs().is_some(),
        menus: system.menus().is_some(),
        logger: system.logger().is_some(),
        wintab: system.wintab_api_enabled(),
        modifiers: system.key_modifiers(),
        sheet_height,
        outline_height,
    })
}
