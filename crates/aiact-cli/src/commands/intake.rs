//! Questionnaire and classification commands

use std::io::Read;
use std::path::Path;

use aiact_intake::{
    answers_from_rows, classify as classify_answers, require_complete, rows_from_answers, tier_row,
    validate as validate_answers, AnswerRow, AnswerSet, CLASSIFICATION_QUESTIONS,
};
use colored::Colorize;
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::output::{heading, print_structured, tier_label, OutputFormat};

/// Read an answers file. With `rows`, the file holds stored answer rows.
pub fn read_answers(path: &Path, rows: bool) -> CliResult<AnswerSet> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };

    let answers = if rows {
        let rows: Vec<AnswerRow> = serde_json::from_str(&text)?;
        answers_from_rows(&rows)
    } else {
        serde_json::from_str(&text)?
    };

    debug!(path = %path.display(), answers = answers.len(), "answers loaded");
    Ok(answers)
}

pub fn show_questions(format: OutputFormat) -> CliResult<()> {
    if print_structured(&CLASSIFICATION_QUESTIONS, format)? {
        return Ok(());
    }

    heading("Classification Questionnaire", 70);
    for (i, q) in CLASSIFICATION_QUESTIONS.iter().enumerate() {
        let required = if q.required { "*".red().to_string() } else { String::new() };
        println!(
            "  {} {}{} {}",
            format!("[{:>2}]", i + 1).bold().yellow(),
            q.label.bold(),
            required,
            format!("({})", q.answer_type).dimmed()
        );
        println!("       key: {}", q.key);
        if let Some(help) = q.help {
            println!("       {}", help.dimmed());
        }
        for option in q.options {
            println!("       - {} {}", option.value, format!("({})", option.label).dimmed());
        }
    }
    println!();
    println!("{}: answers marked * are required", "Note".bold());

    Ok(())
}

pub fn classify(path: &Path, rows: bool, strict: bool, format: OutputFormat) -> CliResult<()> {
    let answers = read_answers(path, rows)?;
    if strict {
        require_complete(&answers)?;
    }

    let result = classify_answers(&answers);
    if print_structured(&result, format)? {
        return Ok(());
    }

    heading("EU AI Act Classification", 50);
    println!("  {}: {}", "Tier".bold(), tier_label(result.risk_tier));
    println!();
    println!("  {}:", "Reasons".bold());
    for reason in &result.reasons {
        println!("    {} {}", "•".cyan(), reason);
    }

    Ok(())
}

pub fn validate(path: &Path, rows: bool, format: OutputFormat) -> CliResult<()> {
    let answers = read_answers(path, rows)?;
    let report = validate_answers(&answers);

    if !print_structured(&report, format)? {
        heading("Answer Validation", 50);
        if report.is_complete() {
            println!("  {} all {} questions answered", "✓".green(), CLASSIFICATION_QUESTIONS.len());
        }
        for issue in &report.issues {
            println!("  {} {}: {}", "✗".red(), issue.question_key.bold(), issue.kind);
        }
    }

    if report.is_complete() {
        Ok(())
    } else {
        Err(CliError::Incomplete(report.issues.len()))
    }
}

/// Convert answers into stored rows. With `tier`, emit only the tier record
/// of their classification.
pub fn to_rows(ai_system_id: &str, path: &Path, tier: bool, format: OutputFormat) -> CliResult<()> {
    let ai_system_id = ai_system_id.trim();
    if ai_system_id.is_empty() {
        return Err(CliError::InvalidArgument("ai_system_id must not be empty".into()));
    }

    let answers = read_answers(path, false)?;
    let rows = if tier {
        vec![tier_row(ai_system_id, &classify_answers(&answers))]
    } else {
        rows_from_answers(ai_system_id, &answers)
    };

    // Rows are machine input; table output falls back to JSON.
    match format {
        OutputFormat::Yaml => print_structured(&rows, format).map(|_| ()),
        _ => print_structured(&rows, OutputFormat::Json).map(|_| ()),
    }
}
