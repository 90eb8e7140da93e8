use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Default external compressor, matching uglify's default compress + mangle behaviour
pub const DEFAULT_MINIFIER: [&str; 3] = ["uglifyjs", "--compress", "--mangle"];

/// An opaque text-to-text JavaScript compressor
pub trait Minifier {
    fn minify(&self, source: &str) -> Result<String>;
}

impl<F> Minifier for F
where
    F: Fn(&str) -> Result<String>,
{
    fn minify(&self, source: &str) -> Result<String> {
        self(source)
    }
}

/// Runs an external program that reads JavaScript on stdin and prints the minified
/// result on stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMinifier {
    program: String,
    args: Vec<String>,
}

impl CommandMinifier {
    /// Build from a command line split into program and arguments
    pub fn from_command<S: AsRef<str>>(command: &[S]) -> Result<Self> {
        let Some((program, args)) = command.split_first() else {
            bail!("Minifier command must not be empty");
        };
        Ok(Self {
            program: program.as_ref().to_owned(),
            args: args.iter().map(|arg| arg.as_ref().to_owned()).collect(),
        })
    }
}

impl Default for CommandMinifier {
    fn default() -> Self {
        Self {
            program: DEFAULT_MINIFIER[0].to_owned(),
            args: DEFAULT_MINIFIER[1..].iter().map(|&arg| arg.to_owned()).collect(),
        }
    }
}

impl Minifier for CommandMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        debug!("Running minifier: {} {}", self.program, self.args.join(" "));
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start minifier `{}`", self.program))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("Minifier stdin was not captured"))?;

        // Feed stdin from another thread so a full stdout pipe cannot block us
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(source.as_bytes()));
            let output = child
                .wait_with_output()
                .context("Failed to wait for minifier")?;
            let written = writer
                .join()
                .map_err(|_| anyhow!("Minifier input thread panicked"))?;
            Ok::<_, anyhow::Error>((output, written))
        })?;

        // Status before write errors: a failing command may close stdin early
        if !output.status.success() {
            bail!(
                "Minifier `{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        written.context("Failed to write bundle to minifier")?;
        String::from_utf8(output.stdout).context("Minifier produced invalid UTF-8")
    }
}
