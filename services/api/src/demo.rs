use crate::infra::{build_assessment_service, AssessmentService};
use clap::Args;
use credit_risk::assessment::{Assessment, ClientProfile, ClientRosterImporter, HistorySummary};
use credit_risk::config::AppConfig;
use credit_risk::error::AppError;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Client name used to label the assessment
    #[arg(long)]
    pub(crate) name: String,
    /// Monthly income
    #[arg(long)]
    pub(crate) income: f64,
    /// Credit history score from 0 (very poor) to 10 (excellent)
    #[arg(long)]
    pub(crate) history_score: f64,
    /// Age in years
    #[arg(long)]
    pub(crate) age: f64,
    /// Years in the current job
    #[arg(long)]
    pub(crate) tenure_years: f64,
    /// Monthly debt as a percentage of income
    #[arg(long)]
    pub(crate) debt_ratio: f64,
    /// Print the assessment as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV roster with header name,income,history_score,age,tenure_years,debt_ratio
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

fn load_service() -> Result<Arc<AssessmentService>, AppError> {
    let config = AppConfig::load()?;
    build_assessment_service(&config.scoring)
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        name,
        income,
        history_score,
        age,
        tenure_years,
        debt_ratio,
        json,
    } = args;

    let service = load_service()?;
    let profile = ClientProfile::new(name, income, history_score, age, tenure_years, debt_ratio);
    let assessment = service.evaluate(&profile)?;

    if json {
        let rendered = serde_json::to_string_pretty(&assessment)
            .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err)))?;
        println!("{rendered}");
    } else {
        print!("{}", render_assessment(&assessment));
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let profiles = ClientRosterImporter::from_path(&args.csv)?;
    let service = load_service()?;

    for profile in &profiles {
        service.evaluate(profile)?;
    }

    let history = service.history()?;
    println!("Assessed {} clients from {}", history.len(), args.csv.display());
    print!("{}", render_table(&history));
    print!("{}", render_distribution(&service.summary()?));
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let service = load_service()?;

    println!("Fuzzy credit risk demo");
    println!("\nReference clients");
    let mut reference = Vec::new();
    for profile in reference_clients() {
        reference.push(service.evaluate(&profile)?);
    }
    print!("{}", render_table(&reference));

    println!("\nExtreme cases");
    for (scenario, profile) in extreme_cases() {
        let assessment = service.evaluate(&profile)?;
        println!(
            "- {scenario}: {:.1} ({}) -> {}",
            assessment.risk_score,
            assessment.classification.label,
            assessment.recommendation.decision.label()
        );
    }

    print!("{}", render_sensitivity(&service));

    let summary = service.summary()?;
    print!("{}", render_distribution(&summary));
    if summary.fallback_count > 0 {
        println!(
            "{} assessment(s) used the fallback scorer",
            summary.fallback_count
        );
    }
    Ok(())
}

pub(crate) fn reference_clients() -> Vec<ClientProfile> {
    vec![
        ClientProfile::new("Ana Executiva", 12_000.0, 9.0, 35.0, 8.0, 20.0),
        ClientProfile::new("João Empresário", 15_000.0, 8.0, 45.0, 15.0, 30.0),
        ClientProfile::new("Maria Professora", 5_500.0, 7.0, 40.0, 12.0, 25.0),
        ClientProfile::new("Pedro Vendedor", 3_500.0, 6.0, 30.0, 5.0, 40.0),
        ClientProfile::new("Carlos Jovem", 2_800.0, 4.0, 24.0, 2.0, 60.0),
        ClientProfile::new("Julia Estudante", 1_500.0, 3.0, 22.0, 1.0, 70.0),
        ClientProfile::new("Roberto Desempregado", 1_200.0, 2.0, 35.0, 0.0, 90.0),
        ClientProfile::new("Sandra Aposentada", 4_000.0, 8.0, 65.0, 30.0, 15.0),
        ClientProfile::new("Lucas Freelancer", 6_000.0, 5.0, 28.0, 3.0, 50.0),
        ClientProfile::new("Fernanda Médica", 18_000.0, 9.0, 32.0, 6.0, 35.0),
    ]
}

pub(crate) fn extreme_cases() -> Vec<(&'static str, ClientProfile)> {
    vec![
        (
            "Perfect client",
            ClientProfile::new("Perfect client", 15_000.0, 10.0, 40.0, 20.0, 5.0),
        ),
        (
            "Worst client",
            ClientProfile::new("Worst client", 1_000.0, 0.0, 20.0, 0.0, 100.0),
        ),
        (
            "Rich but inexperienced",
            ClientProfile::new("Rich but inexperienced", 20_000.0, 2.0, 22.0, 1.0, 80.0),
        ),
        (
            "Low income veteran",
            ClientProfile::new("Low income veteran", 2_000.0, 9.0, 55.0, 25.0, 20.0),
        ),
    ]
}

pub(crate) fn sensitivity_base() -> ClientProfile {
    ClientProfile::new("Sensitivity base", 5_000.0, 6.0, 30.0, 5.0, 40.0)
}

/// One-factor sweeps around [`sensitivity_base`]; each row is `(value, score, delta)`.
pub(crate) fn sensitivity_sweeps(
    service: &AssessmentService,
) -> Vec<(&'static str, Vec<(f64, f64, f64)>)> {
    let base = sensitivity_base();
    let base_score = service.score(&base).score;

    let sweep = |values: Vec<f64>, apply: fn(&mut ClientProfile, f64)| {
        values
            .into_iter()
            .map(|value| {
                let mut profile = base.clone();
                apply(&mut profile, value);
                let score = service.score(&profile).score;
                (value, score, score - base_score)
            })
            .collect::<Vec<_>>()
    };

    vec![
        (
            "income",
            sweep(
                vec![2_000.0, 3_500.0, 5_000.0, 7_500.0, 10_000.0, 15_000.0],
                |profile, value| profile.income = value,
            ),
        ),
        (
            "history score",
            sweep((1..=10).map(f64::from).collect(), |profile, value| {
                profile.history_score = value
            }),
        ),
        (
            "debt ratio",
            sweep(
                vec![10.0, 25.0, 40.0, 60.0, 80.0, 95.0],
                |profile, value| profile.debt_ratio = value,
            ),
        ),
    ]
}

pub(crate) fn render_sensitivity(service: &AssessmentService) -> String {
    let mut out = String::new();
    let base = service.score(&sensitivity_base()).score;
    let _ = writeln!(out, "\nSensitivity (base score {base:.1})");
    for (factor, rows) in sensitivity_sweeps(service) {
        let _ = writeln!(out, "{factor}:");
        for (value, score, delta) in rows {
            let _ = writeln!(out, "  {value:>8.0} -> {score:5.1} ({delta:+5.1})");
        }
    }
    out
}

pub(crate) fn render_assessment(assessment: &Assessment) -> String {
    let mut out = String::new();
    let recommendation = &assessment.recommendation;
    let _ = writeln!(out, "Client: {}", assessment.name);
    let _ = writeln!(
        out,
        "Risk score: {:.1} ({}, via {})",
        assessment.risk_score,
        assessment.classification.label,
        assessment.score_source.label()
    );
    let _ = writeln!(out, "Decision: {}", recommendation.decision.label());
    let _ = writeln!(out, "Credit limit: {:.2}", recommendation.limit);
    let _ = writeln!(out, "Rate: {}", recommendation.rate_policy_label);
    let _ = writeln!(out, "Notes: {}", recommendation.notes);
    out
}

pub(crate) fn render_table(assessments: &[Assessment]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>6}  {:<10} {:<28} {:>10}",
        "Client", "Score", "Band", "Decision", "Limit"
    );
    for assessment in assessments {
        let _ = writeln!(
            out,
            "{:<24} {:>6.1}  {:<10} {:<28} {:>10.2}",
            assessment.name,
            assessment.risk_score,
            assessment.classification.label,
            assessment.recommendation.decision.label(),
            assessment.recommendation.limit
        );
    }
    out
}

pub(crate) fn render_distribution(summary: &HistorySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nRisk distribution ({} assessments)", summary.count);
    if let (Some(mean), Some(min), Some(max)) =
        (summary.mean_score, summary.min_score, summary.max_score)
    {
        let _ = writeln!(out, "- mean {mean:.1} | min {min:.1} | max {max:.1}");
    }
    for band in &summary.bands {
        let share = if summary.count == 0 {
            0.0
        } else {
            band.count as f64 / summary.count as f64 * 100.0
        };
        let _ = writeln!(out, "- {:<10} {:>3} ({share:.0}%)", band.label, band.count);
    }
    out
}
