#![doc(html_logo_url = "https://raw.githubusercontent.com/rtk-rs/.github/master/logos/logo2.jpg")]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::type_complexity)]

/*
 * ASH2RINEX is part of the rtk-rs framework.
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al,
 * (cf. https://github.com/rtk-rs/rinex/graphs/contributors)
 * (cf. https://github.com/rtk-rs/ash2rinex/graphs/contributors)
 * This framework is shipped under Mozilla Public V2 license.
 *
 * Documentation: https://github.com/rtk-rs/ash2rinex
 */

extern crate gnss_rs as gnss;

use std::{
    fs::File,
    io::{BufReader, Read},
};

use env_logger::{Builder, Target};

use log::{error, info, warn, LevelFilter};

use tokio::{signal, sync::watch};

mod ashtech;
mod cli;
mod collecter;
mod error;
mod message;
mod position;
mod stream;
mod time;

use crate::{
    ashtech::{device::STREAMED_MESSAGES, Device, ReceiverIdentity},
    cli::Cli,
    collecter::{
        assembler::{Assembler, AssemblerSettings},
        fd::FileDescriptor,
        rinex::Station,
        runtime::Runtime,
        Collecter,
    },
    error::Error,
    message::settings::DecoderSettings,
    stream::RecordStream,
    time::fix_rollover,
};

/// Everything the pipeline needs, besides its input
struct Pipeline {
    rtm: Runtime,
    decoder: DecoderSettings,
    assembler: AssemblerSettings,
    station: Station,
    filename: String,
    shutdown: watch::Receiver<bool>,
}

impl Pipeline {
    /// Consumes `reader` until end of stream, shutdown or fatal error.
    fn run<R: Read>(
        self,
        reader: R,
        week: u32,
        identity: ReceiverIdentity,
        fd: FileDescriptor,
    ) -> Result<(), Error> {
        let mut assembler = Assembler::new(self.assembler);
        assembler.set_week(week);

        let mut collecter = Collecter::new(
            self.rtm,
            RecordStream::new(reader, self.decoder),
            assembler,
            fd,
            identity,
            self.station,
            self.shutdown,
        );

        let ret = collecter.run();

        collecter.into_inner().finish()?;
        info!("{} - {} released", self.rtm.uptime(), self.filename);
        ret
    }
}

fn run(cli: Cli, shutdown: watch::Receiver<bool>) -> Result<(), Error> {
    let rtm = Runtime::new()?;
    let output = cli.output_settings();

    let pipeline = Pipeline {
        rtm,
        shutdown,
        decoder: cli.decoder_settings()?,
        assembler: cli.assembler_settings(),
        station: cli.station()?,
        filename: output.filename(rtm.deploy_time)?,
    };

    if let Some(path) = cli.replay() {
        let week = cli
            .week()
            .ok_or_else(|| Error::Config("replay requires the GPS week".to_string()))?;

        let reader = BufReader::new(File::open(&path)?);
        info!("replaying {}", path);

        let fd = FileDescriptor::create(&pipeline.filename, output.gzip, output.overwrite)?;
        info!("{} created", pipeline.filename);

        return pipeline.run(reader, week, cli.receiver_identity(), fd);
    }

    let settings = cli.receiver_settings();

    let mut device = Device::open(&settings)?;
    device.disable_output()?;

    let identity = device.query_receiver_identity()?;

    let fd = FileDescriptor::create(&pipeline.filename, output.gzip, output.overwrite)?;
    info!("{} created", pipeline.filename);

    let week = match cli.week() {
        Some(week) => week,
        None => device.query_gps_week()?,
    };

    let corrected = fix_rollover(week, pipeline.assembler.rollover_threshold);
    let clock_week = pipeline.rtm.gps_week();
    if corrected.abs_diff(clock_week) > 1 {
        warn!(
            "gps week {} differs from system clock week {}: check --rollover-threshold",
            corrected, clock_week
        );
    }

    device.configure(&settings)?;
    device.request_stream(settings.message_rate, &STREAMED_MESSAGES)?;

    pipeline.run(device, week, identity, fd)
}

#[tokio::main]
pub async fn main() {
    // cli
    let cli = Cli::new();

    let mut builder = Builder::from_default_env();

    if std::env::var("RUST_LOG").is_err() {
        if cli.verbose() {
            builder.filter_level(LevelFilter::Debug);
        } else {
            builder.filter_level(LevelFilter::Info);
        }
    }

    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    // Tokio
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(_) => {
                let _ = shutdown_tx.send(true);
            },
            Err(e) => error!("signal handling error: {}", e),
        }
    });

    let ret = tokio::task::spawn_blocking(move || run(cli, shutdown_rx)).await;

    match ret {
        Ok(Ok(())) => {},
        Ok(Err(e)) => {
            error!("{}", e);
            std::process::exit(1);
        },
        Err(e) => {
            error!("pipeline aborted: {}", e);
            std::process::exit(1);
        },
    }
}
