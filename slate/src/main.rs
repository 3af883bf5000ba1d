use slate::{run_slate, Opts, SlateResult};
use std::io::Write;
use termcolor::{BufferedStandardStream, ColorChoice, WriteColor};

fn get_opts(color: bool) -> Opts {
    let matches = clap::App::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .arg(
            clap::Arg::with_name("program")
                .help("Function definition to compile, e.g. \"f(x)=2x+1\"")
                .required(true)
                .default_value_if("explain", None, ""),
        )
        .arg(
            clap::Arg::with_name("output-form")
                .short("-o")
                .long("--output-form")
                .next_line_help(true)
                .help(
                    "Slate emit format. Possible values:\n\
                    \tpretty: Human-readable instruction listing.\n\
                    \tjson:   The external compiler interface shape.\n\
                    \tdebug:  Opaque internal representation. Note: this format is not stable.\n\
                    ",
                )
                .hide_possible_values(true)
                .default_value("pretty")
                .takes_value(true)
                .possible_values(&["pretty", "json", "debug"]),
        )
        .arg(
            clap::Arg::with_name("kind")
                .long("--kind")
                .help("Function kind: constant (C), real-to-complex (R2C), or complex-to-complex (C2C).")
                .default_value("R2C")
                .takes_value(true)
                .possible_values(&["C", "R2C", "C2C"]),
        )
        .arg(
            clap::Arg::with_name("explain")
                .long("--explain")
                .value_name("diagnostic")
                .help("Provide a detailed explanation for a diagnostic code.")
                .takes_value(true),
        )
        .get_matches();

    Opts {
        program: matches.value_of("program").unwrap_or_default().into(),
        emit_format: matches.value_of("output-form").unwrap_or("pretty").into(),
        kind: matches.value_of("kind").unwrap_or("R2C").into(),
        explain_diagnostic: matches.value_of("explain").map(str::to_owned),
        color,
    }
}

fn main_impl() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut ch_stdout = BufferedStandardStream::stdout(ColorChoice::Auto);
    let mut ch_stderr = BufferedStandardStream::stderr(ColorChoice::Auto);
    let is_tty = atty::is(atty::Stream::Stderr);
    let use_color = is_tty && ch_stderr.supports_color();

    let opts = get_opts(use_color);
    let SlateResult {
        code,
        stdout,
        stderr,
    } = run_slate(opts);

    if !stderr.is_empty() {
        writeln!(&mut ch_stderr, "{}", stderr)?;
        ch_stderr.flush()?;
    }
    if !stdout.is_empty() {
        writeln!(&mut ch_stdout, "{}", stdout)?;
        ch_stdout.flush()?;
    }

    std::process::exit(code)
}

fn main() {
    let out = std::panic::catch_unwind(main_impl);

    if out.is_err() {
        eprint!("\nnote: you found an internal slate error!\n");
        eprint!("\nnote: we would appreciate a bug report with the offending definition.\n");
        std::process::exit(2);
    }
}
