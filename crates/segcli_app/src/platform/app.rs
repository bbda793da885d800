use std::fs;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use client_logging::client_info;
use segcli_core::{update, AnalysisPhase, AppState, Msg};
use segcli_engine::{write_report_csv, ApiSettings, EngineConfig, EngineHandle, EngineTiming, ExportOptions};

use super::effects::{wire_report, EffectRunner};
use super::{history, logging, ui};
use crate::{Cli, LogArg};

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(match cli.log {
        LogArg::File => logging::LogDestination::File,
        LogArg::Terminal => logging::LogDestination::Terminal,
        LogArg::Both => logging::LogDestination::Both,
    });
    client_info!("segmentation console starting");

    let prior_runs = history::load_history(&cli.output_dir);
    if !prior_runs.is_empty() {
        client_info!(
            "{} prior runs recorded in {:?}",
            prior_runs.len(),
            cli.output_dir
        );
    }

    let engine = EngineHandle::new(EngineConfig {
        api: ApiSettings {
            base_url: cli.base_url.clone(),
            ..ApiSettings::default()
        },
        timing: EngineTiming::default(),
    })
    .map_err(|err| anyhow!("failed to set up HTTP client: {err}"))?;

    let mut session = Session {
        state: AppState::new(),
        runner: EffectRunner::new(engine),
        results_settled: false,
    };

    session.apply(Msg::SessionOpened);
    session.apply(source_msg(&cli)?);
    session.apply(Msg::SubmitRequested);
    if session.state.phase() == AnalysisPhase::Idle {
        // The selection was rejected, so nothing was submitted.
        bail!("no analysis was started; check the data source selection");
    }

    loop {
        let mut idle = true;
        while let Some(msg) = session.runner.try_recv_msg() {
            idle = false;
            if let Msg::ResultsSettled { generation, .. } = &msg {
                if *generation == session.state.generation() {
                    session.results_settled = true;
                }
            }
            session.apply(msg);
        }
        if session.finished() {
            break;
        }
        if idle {
            thread::sleep(Duration::from_millis(20));
        }
    }

    if let Some(report) = session.state.report() {
        let summary =
            write_report_csv(&cli.output_dir, &wire_report(report), ExportOptions::default())
                .context("failed to export segment report")?;
        history::record_run(&cli.output_dir, report);
        println!("Report exported to {}", summary.output_path.display());
    }

    client_info!("segmentation console exiting");
    Ok(())
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    results_settled: bool,
}

impl Session {
    fn apply(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);

        let view = self.state.view();
        if self.state.consume_dirty() {
            for line in ui::render::render(&view) {
                println!("{line}");
            }
            println!();
        }
    }

    fn finished(&self) -> bool {
        match self.state.phase() {
            AnalysisPhase::TimedOut | AnalysisPhase::Failed => true,
            // Wait for the one-shot results fetch to settle either way.
            AnalysisPhase::Completed => self.results_settled,
            _ => false,
        }
    }
}

fn source_msg(cli: &Cli) -> anyhow::Result<Msg> {
    if let Some(path) = &cli.file {
        let meta = fs::metadata(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(ToOwned::to_owned)
            .ok_or_else(|| anyhow!("file path has no usable name: {}", path.display()))?;
        Ok(Msg::FileSelected {
            name,
            size_bytes: meta.len(),
        })
    } else if let Some(name) = &cli.sample {
        Ok(Msg::SampleSelected { name: name.clone() })
    } else {
        bail!("choose a data source with --file or --sample");
    }
}
