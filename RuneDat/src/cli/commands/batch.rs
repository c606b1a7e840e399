//! CLI command for batch conversion

use std::path::Path;
use std::time::Instant;

use crate::batch::{BatchConvertOptions, convert_directory, find_model_files};
use crate::cli::progress::{TRUCK, print_done, print_step, simple_bar};
use crate::formats::ModelFormat;

pub fn execute(
    source: &Path,
    dest: &Path,
    from: Option<ModelFormat>,
    to: ModelFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let total = find_model_files(source)?.len();

    if total == 0 {
        println!("No .dat models found in: {}", source.display());
        return Ok(());
    }

    print_step(1, 1, TRUCK, &format!("Converting {total} models to {to}"));

    let options = BatchConvertOptions {
        target: to,
        source: from,
    };

    let result = if quiet {
        convert_directory(source, dest, &options, |_| {})?
    } else {
        let pb = simple_bar(total as u64, "Converting");
        let result = convert_directory(source, dest, &options, |progress| {
            pb.set_position(progress.current as u64);
            if let Some(ref name) = progress.current_file {
                pb.set_message(name.clone());
            }
        });
        pb.finish_and_clear();
        result?
    };

    println!();
    println!("Conversion complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);

    if result.fail_count > 0 {
        println!();
        println!("Failures:");
        for msg in result.results.iter().filter(|m| m.starts_with("Failed")) {
            println!("  {msg}");
        }
    }

    print_done(started.elapsed());
    Ok(())
}
