use digestx::{
    Fnv1a64, HashAlgorithm, Keccak256, Murmur3, SeedableAlgorithm, Sha3_224, Sha3_256, Sha3_384,
    Sha3_512, Shake128, Shake256,
};
use std::fs::File;
use std::io::{self, Read};
use std::process::ExitCode;
use std::str::FromStr;
use strum::IntoEnumIterator;

const USAGE: &str = "usage: digest [--seed N] [--length BYTES] <algorithm> [FILE...]\n       digest --list";

/// Algorithms the tool can run
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumIter, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
enum Algorithm {
    #[strum(serialize = "fnv1a64")]
    Fnv1a64,
    Murmur3,
    #[strum(serialize = "sha3-224")]
    Sha3_224,
    #[strum(serialize = "sha3-256")]
    Sha3_256,
    #[strum(serialize = "sha3-384")]
    Sha3_384,
    #[strum(serialize = "sha3-512")]
    Sha3_512,
    #[strum(serialize = "keccak256")]
    Keccak256,
    #[strum(serialize = "shake128")]
    Shake128,
    #[strum(serialize = "shake256")]
    Shake256,
}

impl Algorithm {
    /// Bytes printed when no length is given
    fn default_length(self) -> usize {
        match self {
            Algorithm::Fnv1a64 => 8,
            Algorithm::Murmur3 => 16,
            Algorithm::Sha3_224 => 28,
            Algorithm::Sha3_256 | Algorithm::Keccak256 | Algorithm::Shake128 => 32,
            Algorithm::Sha3_384 => 48,
            Algorithm::Sha3_512 | Algorithm::Shake256 => 64,
        }
    }

    /// A fresh state, keyed by `seed` if one is given.
    fn start(self, seed: Option<u64>) -> Box<dyn HashAlgorithm> {
        fn make<A: SeedableAlgorithm + Default + 'static>(
            seed: Option<u64>,
        ) -> Box<dyn HashAlgorithm> {
            match seed {
                Some(seed) => Box::new(A::with_seed(seed)),
                None => Box::new(A::default()),
            }
        }
        match self {
            Algorithm::Fnv1a64 => make::<Fnv1a64>(seed),
            Algorithm::Murmur3 => make::<Murmur3>(seed),
            Algorithm::Sha3_224 => make::<Sha3_224>(seed),
            Algorithm::Sha3_256 => make::<Sha3_256>(seed),
            Algorithm::Sha3_384 => make::<Sha3_384>(seed),
            Algorithm::Sha3_512 => make::<Sha3_512>(seed),
            Algorithm::Keccak256 => make::<Keccak256>(seed),
            Algorithm::Shake128 => make::<Shake128>(seed),
            Algorithm::Shake256 => make::<Shake256>(seed),
        }
    }
}

/// Things that stop the tool
#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("{0}")]
    Usage(String),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Parsed command line
#[derive(Debug, PartialEq)]
struct Options {
    algorithm: Algorithm,
    seed: Option<u64>,
    length: Option<usize>,
    files: Vec<String>,
}

/// What the command line asks for
#[derive(Debug, PartialEq)]
enum Command {
    List,
    Hash(Options),
}

fn value<T: FromStr>(flag: &str, arg: Option<String>) -> Result<T, Error> {
    let arg = arg.ok_or_else(|| Error::Usage(format!("{} needs a value", flag)))?;
    arg.parse()
        .map_err(|_| Error::Usage(format!("bad value for {}: {}", flag, arg)))
}

fn parse(args: impl IntoIterator<Item = String>) -> Result<Command, Error> {
    let mut args = args.into_iter();
    let mut seed = None;
    let mut length = None;
    let mut rest = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--list" => return Ok(Command::List),
            "--seed" => seed = Some(value("--seed", args.next())?),
            "--length" => length = Some(value("--length", args.next())?),
            "-h" | "--help" => return Err(Error::Usage(USAGE.to_owned())),
            _ => rest.push(arg),
        }
    }
    let mut rest = rest.into_iter();
    let name = rest
        .next()
        .ok_or_else(|| Error::Usage(USAGE.to_owned()))?;
    let algorithm = Algorithm::from_str(&name)
        .map_err(|_| Error::Usage(format!("unknown algorithm {}, try --list", name)))?;
    Ok(Command::Hash(Options {
        algorithm,
        seed,
        length,
        files: rest.collect(),
    }))
}

/// Hash everything `reader` yields, returning `length` output bytes.
fn hash_stream(
    options: &Options,
    mut reader: impl Read,
    path: &str,
) -> Result<Vec<u8>, Error> {
    let mut state = options.algorithm.start(options.seed);
    let mut buf = vec![0_u8; 64 * 1024];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        state.update(&buf[..n]);
    }
    let mut out = vec![0_u8; options.length.unwrap_or(options.algorithm.default_length())];
    state.output(&mut out);
    Ok(out)
}

fn run(options: &Options) -> Result<(), Error> {
    if options.files.is_empty() {
        let sum = hash_stream(options, io::stdin().lock(), "-")?;
        println!("{}  -", hex::encode(sum));
        return Ok(());
    }
    for path in &options.files {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let sum = hash_stream(options, file, path)?;
        println!("{}  {}", hex::encode(sum), path);
    }
    Ok(())
}

fn main() -> ExitCode {
    let result = parse(std::env::args().skip(1)).and_then(|command| match command {
        Command::List => {
            for algorithm in Algorithm::iter() {
                println!("{:<10} {} bytes", algorithm, algorithm.default_length());
            }
            Ok(())
        }
        Command::Hash(options) => run(&options),
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("digest: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod test {
    use super::{hash_stream, parse, Algorithm, Command, Options};
    use strum::IntoEnumIterator;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn names_round_trip() {
        for algorithm in Algorithm::iter() {
            assert_eq!(algorithm.to_string().parse::<Algorithm>(), Ok(algorithm));
        }
        assert_eq!("sha3-256".parse::<Algorithm>(), Ok(Algorithm::Sha3_256));
    }

    #[test]
    fn command_lines() {
        assert_eq!(parse(args("--list")).ok(), Some(Command::List));
        assert_eq!(
            parse(args("--seed 7 murmur3 a b")).ok(),
            Some(Command::Hash(Options {
                algorithm: Algorithm::Murmur3,
                seed: Some(7),
                length: None,
                files: args("a b"),
            }))
        );
        assert!(parse(args("md5")).is_err());
        assert!(parse(args("--length x fnv1a64")).is_err());
        assert!(parse(Vec::new()).is_err());
    }

    #[test]
    fn hashes_readers() {
        let options = Options {
            algorithm: Algorithm::Sha3_256,
            seed: None,
            length: None,
            files: Vec::new(),
        };
        let sum = hash_stream(&options, &b"foobar"[..], "-").expect("in-memory read");
        assert_eq!(
            hex::encode(sum),
            "09234807e4af85f17c66b48ee3bca89dffd1f1233659f9f940a2b17b0b8c6bc5"
        );

        let options = Options {
            algorithm: Algorithm::Murmur3,
            length: Some(4),
            ..options
        };
        let sum = hash_stream(&options, &b""[..], "-").expect("in-memory read");
        assert_eq!(sum, [0; 4]);
    }
}
