use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;
use thiserror::Error;
use torlife::{Board, Pos2, config::NUM_THREADS};

#[derive(Debug, Error)]
pub enum ArgsError {
    #[error(transparent)]
    Parse(#[from] getopts::Fail),
    #[error("invalid value {value:?} for --{name}")]
    Value { name: &'static str, value: String },
    #[error("unknown fill mode {0:?}")]
    Fill(String),
}

#[derive(Debug)]
pub struct Args {
    pub size: usize,
    pub generations: usize,
    pub threads: usize,
    pub chunk: usize,
    pub fill: FillMode,
    pub seed: Option<u64>,
    pub console: bool,
    pub sleep: Option<Duration>,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
    pub stats_file: Option<String>,
}

fn opt_value<T: std::str::FromStr>(
    matches: &getopts::Matches,
    name: &'static str,
) -> Result<Option<T>, ArgsError> {
    match matches.opt_str(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ArgsError::Value { name, value }),
        None => Ok(None),
    }
}

impl Args {
    fn new<T: AsRef<str>>(args: &[T]) -> Result<Option<Self>, ArgsError> {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("c", "console", "run in console mode");
        opts.optopt("t", "threads", "number of worker threads", "COUNT");
        opts.optopt("o", "output", "write the final board as RLE", "FILE");
        opts.optopt("i", "input", "read the initial pattern from an RLE file", "FILE");
        opts.optopt("n", "size", "set the board size", "SIZE");
        opts.optopt("f", "fill", "random, alternating, all, empty or glider", "TYPE");
        opts.optopt("", "seed", "seed for the random fill", "SEED");
        opts.optopt(
            "s",
            "sleep",
            "the amount of time to sleep between generations",
            "MILLIS",
        );
        opts.optopt("g", "gens", "number of generations", "COUNT");
        opts.optopt("", "chunk", "generations per engine call", "COUNT");
        opts.optopt("", "stats", "write stats csv to file", "FILE");

        let matches = opts.parse(args.iter().map(T::as_ref))?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: torlife [options]"));
            return Ok(None);
        }

        let console = matches.opt_present("console");
        let sleep = match opt_value::<u64>(&matches, "sleep")? {
            Some(millis) => Some(Duration::from_millis(millis)),
            None if console => Some(Duration::from_millis(100)),
            None => None,
        };
        let fill = match matches.opt_str("fill") {
            Some(mode) => FillMode::new(&mode).ok_or(ArgsError::Fill(mode))?,
            None => FillMode::Random,
        };

        Ok(Some(Self {
            size: opt_value(&matches, "size")?.unwrap_or(512),
            generations: opt_value(&matches, "gens")?.unwrap_or(100),
            threads: opt_value(&matches, "threads")?.unwrap_or(NUM_THREADS),
            chunk: opt_value::<usize>(&matches, "chunk")?.unwrap_or(100).max(1),
            fill,
            seed: opt_value(&matches, "seed")?,
            console,
            sleep,
            input_file: matches.opt_str("input"),
            output_file: matches.opt_str("output"),
            stats_file: matches.opt_str("stats"),
        }))
    }

    pub fn from_env() -> Result<Option<Self>, ArgsError> {
        let env = std::env::args().skip(1).collect::<Vec<_>>();
        Self::new(&env)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Random,
    Alternating,
    All,
    Empty,
    Glider,
}
impl FillMode {
    fn new<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "random" => Some(Self::Random),
            "alternating" => Some(Self::Alternating),
            "all" => Some(Self::All),
            "empty" => Some(Self::Empty),
            "glider" => Some(Self::Glider),
            _ => None,
        }
    }

    pub fn create_board<R: Rng>(self, size: usize, rng: &mut R) -> Board {
        match self {
            Self::Empty => Board::square(size),
            Self::Glider => {
                let center = (size / 2) as i32;
                let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
                Board::from_alive(
                    size,
                    size,
                    glider.map(|(x, y)| Pos2 { x: center + x, y: center + y }),
                )
            }
            _ => {
                let mut board = Board::square(size);
                for row in 0..size {
                    for col in 0..size {
                        let alive = match self {
                            Self::Random => rng.random_bool(0.5),
                            Self::Alternating => (row + col) % 2 == 0,
                            _ => true,
                        };
                        board.set(row, col, alive);
                    }
                }
                board
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        Args::new(list).unwrap().expect("not a help request")
    }

    #[test]
    fn defaults_are_applied() {
        let args = args(&[]);
        assert_eq!(args.size, 512);
        assert_eq!(args.generations, 100);
        assert_eq!(args.threads, NUM_THREADS);
        assert_eq!(args.fill, FillMode::Random);
        assert_eq!(args.sleep, None);
    }

    #[test]
    fn options_are_parsed() {
        let args = args(&[
            "-n",
            "64",
            "--gens",
            "10",
            "-t",
            "8",
            "--fill",
            "alternating",
            "--seed",
            "3",
        ]);
        assert_eq!(args.size, 64);
        assert_eq!(args.generations, 10);
        assert_eq!(args.threads, 8);
        assert_eq!(args.fill, FillMode::Alternating);
        assert_eq!(args.seed, Some(3));
    }

    #[test]
    fn console_mode_sleeps_by_default() {
        assert_eq!(args(&["--console"]).sleep, Some(Duration::from_millis(100)));
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(matches!(
            Args::new(&["--size", "big"]),
            Err(ArgsError::Value { name: "size", .. })
        ));
        assert!(matches!(Args::new(&["--fill", "spiral"]), Err(ArgsError::Fill(_))));
        assert!(matches!(Args::new(&["--bogus"]), Err(ArgsError::Parse(_))));
    }

    #[test]
    fn help_returns_none() {
        assert!(Args::new(&["--help"]).unwrap().is_none());
    }

    #[test]
    fn fill_all_and_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(FillMode::All.create_board(3, &mut rng).alive_count(), 9);
        assert_eq!(FillMode::Empty.create_board(3, &mut rng).alive_count(), 0);
    }

    #[test]
    fn fill_alternating_uses_parity() {
        let mut rng = StdRng::seed_from_u64(0);
        let board = FillMode::Alternating.create_board(3, &mut rng);
        assert_eq!(board.to_string(), "O.O\n.O.\nO.O\n");
    }

    #[test]
    fn seeded_random_fill_is_repeatable() {
        let a = FillMode::Random.create_board(16, &mut StdRng::seed_from_u64(9));
        let b = FillMode::Random.create_board(16, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn glider_fill_places_five_cells() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(FillMode::Glider.create_board(32, &mut rng).alive_count(), 5);
    }
}
