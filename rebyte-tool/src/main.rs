use rebyte::{Flags, Match, Regex};
use std::process::exit;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "rebyte")]
struct Opt {
    /// The regular expression.
    pattern: String,

    /// Dump the parsed tree to stderr.
    #[structopt(long)]
    dump_ast: bool,

    /// Dump the compiled block graph to stderr.
    #[structopt(long)]
    dump_blocks: bool,

    /// Trace every VM step to stderr.
    #[structopt(long)]
    trace: bool,

    /// Skip the jump-coalescing pass.
    #[structopt(long)]
    no_opt: bool,

    /// The input values to match against.
    inputs: Vec<String>,
}

fn format_match(m: &Match, input: &[u8]) -> String {
    let mut result = String::from_utf8_lossy(&input[m.range()]).into_owned();
    for cg in m.groups() {
        result.push(',');
        if let Some(cg) = cg {
            result.push_str(&String::from_utf8_lossy(cg.bytes));
        }
    }
    result
}

fn exec_re_on_string(re: &Regex, input: &str) {
    let bytes = input.as_bytes();
    let mut matches = re.find_iter(bytes);
    if let Some(res) = matches.next() {
        let count = 1 + matches.count();
        println!("Match: {}, total: {}", format_match(&res, bytes), count);
    } else {
        println!("No match");
    }
}

fn main() {
    let opt = Opt::from_args();
    let flags = Flags {
        no_opt: opt.no_opt,
        dump_ast: opt.dump_ast,
        dump_blocks: opt.dump_blocks,
        trace_execution: opt.trace,
    };
    let re = match Regex::compile(opt.pattern.as_bytes(), flags) {
        Ok(re) => re,
        Err(err) => {
            eprintln!("Pattern failed to compile: {}", err);
            exit(1);
        }
    };
    if opt.inputs.is_empty() {
        eprintln!("No inputs given");
        exit(1);
    }
    for input in &opt.inputs {
        exec_re_on_string(&re, input);
    }
}
