use std::{io, path::Path, time::Instant};

pub trait Recorder {
    type Str: AsRef<str>;

    /// Records that `gens` more generations ran, leaving `alive` cells
    fn record(&mut self, gens: usize, alive: usize);

    fn has_report(&self) -> bool;
    fn report(&mut self) -> Self::Str;
}

pub struct SimpleRecord {
    gens: usize,
    alive: usize,
    gens_in_report: usize,
    last_report: Instant,
}
impl SimpleRecord {
    pub fn new(alive: usize) -> Self {
        Self {
            gens: 0,
            alive,
            gens_in_report: 0,
            last_report: Instant::now(),
        }
    }

    #[inline]
    pub fn gens(&self) -> usize {
        self.gens
    }
}
impl Recorder for SimpleRecord {
    type Str = String;

    fn record(&mut self, gens: usize, alive: usize) {
        self.gens += gens;
        self.gens_in_report += gens;
        self.alive = alive;
    }

    fn has_report(&self) -> bool {
        self.last_report.elapsed().as_millis() >= 500
    }
    fn report(&mut self) -> Self::Str {
        let gens_per_sec = self.gens_in_report as f64 / self.last_report.elapsed().as_secs_f64();
        self.last_report = Instant::now();
        self.gens_in_report = 0;

        format!(
            "{:.02}gen/s gens:{}, alive:{}",
            gens_per_sec, self.gens, self.alive
        )
    }
}

/// Keeps one `(gen, delta_us, alive)` row per record for a CSV file
pub struct CsvRecord {
    inner: SimpleRecord,
    data: Vec<(usize, u128, usize)>,
    last: Instant,
}
impl CsvRecord {
    pub fn new(alive: usize) -> Self {
        Self {
            inner: SimpleRecord::new(alive),
            data: Vec::new(),
            last: Instant::now(),
        }
    }

    pub fn write_csv<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(b"gen,delta_us,alive\n")?;
        for (generation, delta, alive) in &self.data {
            writeln!(out, "{generation},{delta},{alive}")?;
        }
        out.flush()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(io::BufWriter::new(file))
    }
}
impl Recorder for CsvRecord {
    type Str = <SimpleRecord as Recorder>::Str;

    fn record(&mut self, gens: usize, alive: usize) {
        let delta = self.last.elapsed().as_micros();
        self.last = Instant::now();

        self.inner.record(gens, alive);
        self.data.push((self.inner.gens(), delta, alive));
    }

    fn has_report(&self) -> bool {
        self.inner.has_report()
    }
    fn report(&mut self) -> Self::Str {
        self.inner.report()
    }
}

pub enum SwitchRecorder {
    Csv(CsvRecord),
    Simple(SimpleRecord),
}
impl SwitchRecorder {
    pub fn new(alive: usize, csv: bool) -> Self {
        if csv {
            Self::Csv(CsvRecord::new(alive))
        } else {
            Self::Simple(SimpleRecord::new(alive))
        }
    }
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        match self {
            Self::Csv(r) => r.save(path),
            Self::Simple(_) => Err(io::Error::other("statistics were not recorded as csv")),
        }
    }
}
impl Recorder for SwitchRecorder {
    type Str = String;

    fn record(&mut self, gens: usize, alive: usize) {
        match self {
            Self::Csv(r) => r.record(gens, alive),
            Self::Simple(r) => r.record(gens, alive),
        }
    }
    fn has_report(&self) -> bool {
        match self {
            Self::Csv(r) => r.has_report(),
            Self::Simple(r) => r.has_report(),
        }
    }
    fn report(&mut self) -> Self::Str {
        match self {
            Self::Csv(r) => r.report(),
            Self::Simple(r) => r.report(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_sums_generations() {
        let mut record = SimpleRecord::new(10);
        record.record(3, 8);
        record.record(2, 5);
        let report = record.report();
        assert!(report.ends_with("gens:5, alive:5"), "{report}");
    }

    #[test]
    fn csv_has_one_row_per_record() {
        let mut record = CsvRecord::new(10);
        record.record(4, 7);
        record.record(4, 6);

        let mut out = Vec::new();
        record.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "gen,delta_us,alive");
        assert!(lines[1].starts_with("4,") && lines[1].ends_with(",7"));
        assert!(lines[2].starts_with("8,") && lines[2].ends_with(",6"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn simple_recorder_cannot_save() {
        let recorder = SwitchRecorder::new(0, false);
        assert!(recorder.save("unused.csv").is_err());
    }
}
