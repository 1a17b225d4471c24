use std::{process::ExitCode, time::Duration};

use po_translate::{
    BackendConfig, BatchOptions, FileReport, Glossary, Progress, RunSummary, Service,
    build_translator, find_files, lang, traits::Parser, translate_path,
};

use crate::Args;

/// Resolve settings, then translate every file found. Configuration problems
/// stop the run before any file is read; per-file failures do not.
pub fn run(args: Args) -> ExitCode {
    let target = match resolve_target(args.target.as_deref()) {
        Some(target) => target,
        None => {
            eprintln!("❌ Error: --target required (could not detect from LANG environment)");
            return ExitCode::FAILURE;
        }
    };
    let source = checked_language(&args.source);
    let target = checked_language(&target);

    let service = match args.service.parse::<Service>() {
        Ok(service) => service,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = BackendConfig {
        api_key: args.api_key.clone(),
        url: args.url.clone(),
        model: args.model.clone(),
        email: args.email.clone(),
    };
    let translator = match build_translator(service, &config) {
        Ok(translator) => translator,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let glossary = match &args.glossary {
        Some(path) => match Glossary::read_from(path) {
            Ok(glossary) => Some(glossary),
            Err(e) => {
                eprintln!("❌ Error: cannot load glossary {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let files = find_files(&args.paths, !args.no_recursive);
    if files.is_empty() {
        eprintln!("❌ No .po, .ts or .xliff files found");
        return ExitCode::FAILURE;
    }

    println!("🌐 po-translate - {} → {}", source, target);
    println!("📦 Service: {}", service);
    println!("📂 Files: {}", files.len());
    if let Some(glossary) = &glossary {
        println!("📖 Glossary: {} terms", glossary.len());
    }
    println!();

    let options = BatchOptions::new(source, target)
        .with_batch_size(usize::try_from(args.batch_size).unwrap_or(usize::MAX))
        .with_dry_run(args.dry_run)
        .with_batch_pause(Duration::from_millis(args.batch_pause));

    let mut summary = RunSummary::default();
    for path in &files {
        println!("📄 {}", path.display());
        match translate_path(path, &translator, &options, print_progress) {
            Ok(report) => {
                print_file_result(path.display(), &report);
                summary.record(&report);
            }
            Err(e) if e.is_unsupported() => {
                println!("  ❌ {}", e);
                summary.record_failure();
            }
            Err(e) => {
                eprintln!("  ❌ Error: {}", e);
                summary.record_failure();
            }
        }
        println!();
    }

    print_summary(&summary, args.dry_run);
    ExitCode::SUCCESS
}

/// `--target`, or the language of the process locale.
fn resolve_target(target: Option<&str>) -> Option<String> {
    if let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(target.to_string());
    }
    let detected = lang::target_from_env()?;
    println!("ℹ️  Using target language from LANG: {}", detected);
    Some(detected)
}

/// Normalise a language code, keeping it as typed if it is not a valid tag.
fn checked_language(code: &str) -> String {
    match lang::normalize_language(code) {
        Some(code) => code,
        None => {
            eprintln!("⚠️  '{}' does not look like a language code, using it as-is", code);
            code.trim().to_string()
        }
    }
}

fn print_progress(progress: Progress) {
    match progress {
        Progress::Started { pending, .. } => {
            println!("  📝 {} strings to translate...", pending);
        }
        Progress::BatchDone { index, batches, .. } => {
            println!("  🔄 Batch {}/{}... ✓", index, batches);
        }
    }
}

fn print_file_result(path: impl std::fmt::Display, report: &FileReport) {
    if report.translated == 0 {
        println!("  ✅ Nothing to translate ({} entries)", report.total);
    } else if report.saved {
        println!("  💾 Saved: {}", path);
    } else {
        println!("  🔍 Dry run: would save {}", path);
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    println!("{}", "=".repeat(40));
    println!("✅ Done! Translated {} strings", summary.translated);
    println!("   Total entries: {}", summary.total);
    if summary.failed > 0 {
        println!("   Failed files: {}", summary.failed);
    }
    if summary.translated > 0 {
        println!(
            "   Characters: {} → {} ({:.1} chars/s)",
            summary.source_chars,
            summary.translated_chars,
            summary.chars_per_second()
        );
    }
    if dry_run {
        println!("   (dry run - no files modified)");
    }
}
