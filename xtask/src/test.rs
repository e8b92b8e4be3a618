use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// One `cargo` invocation with a status line.
pub struct Step<'a> {
    pub label: &'a str,
    pub args: &'a [&'a str],
    /// Abort the run on failure instead of warning.
    pub fatal: bool,
}

/// Run `step`, print its outcome and return whether it passed.
pub fn cargo_step(step: &Step<'_>) -> Result<bool> {
    println!("{}", format!("  Running {}...", step.label).cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(step.args)
        .output()
        .with_context(|| format!("Failed to run cargo for {}", step.label))?;

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let summary = extract_test_summary(&stdout)
            .map(|s| format!("{s} "))
            .unwrap_or_default();
        println!(
            "{}",
            format!(
                "  ✓ {} passed {}in {:.2}s",
                step.label,
                summary,
                start.elapsed().as_secs_f64()
            )
            .green()
        );
        println!();
        return Ok(true);
    }

    if step.fatal {
        eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
        eprintln!();
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            eprintln!("  {line}");
        }
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{} failed", step.label);
    }

    eprintln!("{}", format!("  ⚠ {} reported problems", step.label).yellow().bold());
    eprintln!();
    Ok(false)
}

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        cargo_step(&Step {
            label: "unit tests",
            args: &["test", "--lib", "--bins", "--workspace"],
            fatal: true,
        })?;
    }

    if !unit_only {
        // drivers/tests and platform/tests, run against the host mocks
        cargo_step(&Step {
            label: "integration tests",
            args: &["test", "--workspace", "--test", "*"],
            fatal: true,
        })?;
        cargo_step(&Step {
            label: "serde config tests",
            args: &["test", "-p", "drivers", "--lib", "--features", "serde"],
            fatal: true,
        })?;
    }

    cargo_step(&Step {
        label: "doc tests",
        args: &["test", "--doc", "--workspace"],
        fatal: false,
    })?;

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

/// Pull "ok. 5 passed; ..." out of the last `test result:` line.
fn extract_test_summary(output: &str) -> Option<String> {
    output
        .lines()
        .rev()
        .find_map(|line| line.split("test result:").nth(1))
        .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_last_result_line() {
        let out = "test result: ok. 3 passed; 0 failed\n\
                   running 2 tests\n\
                   test result: ok. 2 passed; 0 failed\n";
        assert_eq!(
            extract_test_summary(out).as_deref(),
            Some("ok. 2 passed; 0 failed")
        );
    }

    #[test]
    fn summary_missing() {
        assert_eq!(extract_test_summary("error: could not compile"), None);
    }
}
