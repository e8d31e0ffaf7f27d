use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use ledframe_core::protocol::layout::{DEFAULT_PORT, MAX_DATAGRAM_LEN, RECORD_LEN};
use ledframe_core::protocol::{Command, encode_commands};
use ledframe_core::{
    ChannelOrder, Framebuffer, HardwareError, LedTransport, NullTransport, PanelGeometry,
    Rgb, SerpentineMapper, ServeError, UdpSource, WriterTransport,
};

mod logging;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LEDFRAME_BUILD_COMMIT"),
    " ",
    env!("LEDFRAME_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "ledframe")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "UDP framebuffer for serpentine-wired LED panel matrices.",
    long_about = None,
    after_help = "Examples:\n  ledframe serve --output /run/ledframe/frames.fifo\n  ledframe send 192.168.0.20:5005 --fill 0,0,32\n  ledframe layout --pretty"
)]
struct Cli {
    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Listen for pixel datagrams and drive the LED chain.
    Serve {
        /// Address to listen on
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
        bind: IpAddr,

        /// UDP port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Raw frame output (device node, FIFO or file; `-` for stdout).
        /// Frames are discarded when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Byte order of each LED on the output
        #[arg(long, value_enum, default_value_t = OrderArg::Grb)]
        order: OrderArg,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
    /// Send one batch of commands to a running server.
    Send {
        /// Target address (`host:port`)
        target: String,

        /// Set every pixel to `R,G,B`
        #[arg(long, value_name = "R,G,B")]
        fill: Option<ColorArg>,

        /// Set one pixel, `X,Y,R,G,B` (repeatable)
        #[arg(long = "pixel", value_name = "X,Y,R,G,B")]
        pixels: Vec<PixelArg>,

        /// Do not append a flush record
        #[arg(long)]
        no_flush: bool,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
    /// Print the chain order of every LED as JSON.
    Layout {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
}

#[derive(Args, Debug)]
struct GeometryArgs {
    /// Logical matrix width in pixels
    #[arg(long, default_value_t = PanelGeometry::DEFAULT.matrix_width())]
    matrix_width: u16,

    /// Logical matrix height in pixels
    #[arg(long, default_value_t = PanelGeometry::DEFAULT.matrix_height())]
    matrix_height: u16,

    /// Width of one physical panel
    #[arg(long, default_value_t = PanelGeometry::DEFAULT.panel_width())]
    panel_width: u16,

    /// Height of one physical panel (rows per band)
    #[arg(long, default_value_t = PanelGeometry::DEFAULT.panel_height())]
    panel_height: u16,
}

impl GeometryArgs {
    fn resolve(&self) -> Result<PanelGeometry, CliError> {
        PanelGeometry::new(
            self.matrix_width,
            self.matrix_height,
            self.panel_width,
            self.panel_height,
        )
        .map_err(|err| {
            CliError::new(
                format!("invalid geometry: {err}"),
                Some(
                    "panels must span the full width and the height must be a whole number of panels"
                        .to_string(),
                ),
            )
        })
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    Rgb,
    Grb,
}

impl From<OrderArg> for ChannelOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Rgb => ChannelOrder::Rgb,
            OrderArg::Grb => ChannelOrder::Grb,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ColorArg(Rgb);

impl FromStr for ColorArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [r, g, b] = parse_bytes::<3>(s)?;
        Ok(ColorArg(Rgb::new(r, g, b)))
    }
}

#[derive(Clone, Copy, Debug)]
struct PixelArg {
    x: u8,
    y: u8,
    color: Rgb,
}

impl FromStr for PixelArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, r, g, b] = parse_bytes::<5>(s)?;
        Ok(PixelArg {
            x,
            y,
            color: Rgb::new(r, g, b),
        })
    }
}

fn parse_bytes<const N: usize>(s: &str) -> Result<[u8; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated values, got {}", parts.len()));
    }
    let mut out = [0u8; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not a value in 0..=255"))?;
    }
    Ok(out)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup(&cli.verbosity);

    let result = match cli.command {
        Commands::Serve {
            bind,
            port,
            output,
            order,
            geometry,
        } => cmd_serve(bind, port, output, order, &geometry),
        Commands::Send {
            target,
            fill,
            pixels,
            no_flush,
            geometry,
        } => cmd_send(&target, fill, &pixels, no_flush, &geometry),
        Commands::Layout { pretty, geometry } => cmd_layout(pretty, &geometry),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_serve(
    bind: IpAddr,
    port: u16,
    output: Option<PathBuf>,
    order: OrderArg,
    geometry: &GeometryArgs,
) -> Result<(), CliError> {
    let geometry = geometry.resolve()?;

    let mut transport: Box<dyn LedTransport> = match output.as_ref() {
        Some(path) => {
            let writer = WriterTransport::open(path, geometry.led_count(), order.into())
                .map_err(|err| {
                    CliError::new(
                        err.to_string(),
                        Some("check that the output path exists and is writable".to_string()),
                    )
                })?;
            Box::new(writer)
        }
        None => {
            tracing::warn!("no --output given, frames will be discarded");
            Box::new(NullTransport::new())
        }
    };

    let addr = SocketAddr::new(bind, port);
    let mut source = UdpSource::bind(addr).map_err(|err| {
        CliError::new(
            format!("failed to bind {addr}: {err}"),
            Some("use --port to pick a free port".to_string()),
        )
    })?;
    let local = source
        .local_addr()
        .with_context(|| format!("failed to query bound address for {addr}"))?;

    tracing::info!(
        %local,
        width = geometry.matrix_width(),
        height = geometry.matrix_height(),
        leds = geometry.led_count(),
        "listening for pixel datagrams"
    );

    let mut framebuffer = Framebuffer::new(geometry);
    match ledframe_core::serve(&mut source, &mut framebuffer, &mut transport) {
        Ok(stats) => {
            tracing::info!(?stats, "source closed");
            Ok(())
        }
        Err(ServeError::Hardware(err)) => Err(hardware_error(err)),
    }
}

fn hardware_error(err: HardwareError) -> CliError {
    CliError::new(
        err.to_string(),
        Some(
            "the LEDs no longer match the framebuffer; restart once the output is back"
                .to_string(),
        ),
    )
}

fn cmd_send(
    target: &str,
    fill: Option<ColorArg>,
    pixels: &[PixelArg],
    no_flush: bool,
    geometry: &GeometryArgs,
) -> Result<(), CliError> {
    let geometry = geometry.resolve()?;
    let commands = build_commands(&geometry, fill, pixels, !no_flush);
    if commands.is_empty() {
        return Err(CliError::new(
            "nothing to send",
            Some("use --fill, --pixel, or drop --no-flush".to_string()),
        ));
    }

    let target_addr = target
        .to_socket_addrs()
        .with_context(|| format!("failed to resolve target '{target}'"))?
        .next()
        .ok_or_else(|| {
            CliError::new(
                format!("no address found for '{target}'"),
                Some("use host:port, e.g. 127.0.0.1:5005".to_string()),
            )
        })?;
    let local: SocketAddr = if target_addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local).context("failed to bind sending socket")?;

    let records_per_datagram = MAX_DATAGRAM_LEN / RECORD_LEN;
    for chunk in commands.chunks(records_per_datagram) {
        let datagram = encode_commands(chunk);
        socket
            .send_to(&datagram, target_addr)
            .with_context(|| format!("failed to send to {target_addr}"))?;
        tracing::debug!(records = chunk.len(), bytes = datagram.len(), %target_addr, "datagram sent");
    }
    Ok(())
}

/// Fill first, then explicit pixels, then one trailing flush.
fn build_commands(
    geometry: &PanelGeometry,
    fill: Option<ColorArg>,
    pixels: &[PixelArg],
    flush: bool,
) -> Vec<Command> {
    let mut commands = Vec::new();
    if let Some(ColorArg(color)) = fill {
        for y in 0..geometry.matrix_height() {
            for x in 0..geometry.matrix_width() {
                commands.push(Command::set_pixel(x as u8, y as u8, color));
            }
        }
    }
    commands.extend(
        pixels
            .iter()
            .map(|pixel| Command::set_pixel(pixel.x, pixel.y, pixel.color)),
    );
    if flush {
        commands.push(Command::Flush);
    }
    commands
}

fn cmd_layout(pretty: bool, geometry: &GeometryArgs) -> Result<(), CliError> {
    let geometry = geometry.resolve()?;
    let layout = SerpentineMapper::new(geometry).layout();
    let json = if pretty {
        serde_json::to_string_pretty(&layout)
    } else {
        serde_json::to_string(&layout)
    }
    .context("JSON serialization failed")?;
    println!("{}", json);
    Ok(())
}
