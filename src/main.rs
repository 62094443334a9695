use clap::{arg,crate_version,Command};
use magicoder::{orchestrator, Options};

const RCH: &str = "unreachable was reached";

fn build_options(cmd: &clap::ArgMatches) -> Options {
    let key = cmd.get_one::<String>("key").map(|s| s.as_bytes().to_vec()).unwrap_or_default();
    let pin = cmd.get_one::<String>("pin").map(|s| s.parse::<u32>().expect(RCH)).unwrap_or(0);
    let iv_length = cmd.get_one::<String>("iv-length").map(|s| s.parse::<usize>().expect(RCH)).unwrap_or(0);
    let coding_step = cmd.get_one::<String>("step").map(|s| s.parse::<u32>().expect(RCH)).unwrap_or(0);
    Options { key, pin, iv_length, coding_step }
}

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::init();

    let long_help =
"Examples:
---------
Encode:        `magicoder encode -i plain.bin -o cipher.bin -k secret`
Decode:        `magicoder decode -i cipher.bin -o plain.bin -k secret`
LZW encode:    `magicoder lzw-encode -i plain.bin -o cipher.bin -k secret`";

    let shared_args = || {
        vec![
            arg!(-i --input <PATH> "input path").required(true),
            arg!(-o --output <PATH> "output path").required(true),
            arg!(-k --key [STRING] "key bytes, taken as UTF-8").required(false),
            arg!(-p --pin [NUMBER] "PIN seeding the IV generator").required(false),
            arg!(--"iv-length" [NUMBER] "number of IV bytes to generate").required(false),
            arg!(-s --step [NUMBER] "adaptation step, 0 means 256").required(false),
        ]
    };

    let mut main_cmd = Command::new("magicoder")
        .about("Compress and obfuscate a byte stream with an adaptive arithmetic coder")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("encode")
        .args(shared_args())
        .about("encode a file"));
    main_cmd = main_cmd.subcommand(Command::new("decode")
        .args(shared_args())
        .about("decode a file"));
    main_cmd = main_cmd.subcommand(Command::new("lzw-encode")
        .args(shared_args())
        .about("LZW-front then encode a file"));
    main_cmd = main_cmd.subcommand(Command::new("lzw-decode")
        .args(shared_args())
        .about("decode then LZW-reverse a file"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("encode") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = build_options(cmd);
        let dat = std::fs::read(path_in)?;
        let encoded = orchestrator::encode(&opt,&dat)?;
        std::fs::write(path_out,encoded)?;
    }

    if let Some(cmd) = matches.subcommand_matches("decode") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = build_options(cmd);
        let dat = std::fs::read(path_in)?;
        let decoded = orchestrator::decode(&opt,&dat)?;
        std::fs::write(path_out,decoded)?;
    }

    if let Some(cmd) = matches.subcommand_matches("lzw-encode") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = build_options(cmd);
        let dat = std::fs::read(path_in)?;
        let encoded = orchestrator::lzw_encode(&opt,&dat)?;
        std::fs::write(path_out,encoded)?;
    }

    if let Some(cmd) = matches.subcommand_matches("lzw-decode") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = build_options(cmd);
        let dat = std::fs::read(path_in)?;
        let decoded = orchestrator::lzw_decode(&opt,&dat)?;
        std::fs::write(path_out,decoded)?;
    }

    Ok(())
}
