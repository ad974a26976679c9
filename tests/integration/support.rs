//! Shared fixtures: synthetic trajectory corpora and scripted doubles.

use trajplay_rs::{
    EvalError, FrameSink, IncompleteFrame, Simulation, TrajStream, FRAME_TAG,
};

/// One complete frame record: tag line, one payload line, terminator.
pub fn frame_record(n: u64, fill: usize) -> String {
    let mut rec = format!("{FRAME_TAG}{n}\n");
    rec.push_str(&"x".repeat(fill));
    rec.push('\n');
    rec.push_str("#end\n");
    rec
}

/// Frames 1..=n with per-frame record sizes, plus each boundary's offset.
pub fn corpus(n: u64) -> (Vec<u8>, Vec<u64>) {
    let mut data = String::new();
    let mut offsets = Vec::new();
    for i in 1..=n {
        offsets.push(data.len() as u64);
        data.push_str(&frame_record(i, 20 + 11 * i as usize));
    }
    (data.into_bytes(), offsets)
}

/// Three frames whose records are sized so the boundaries sit at byte
/// offsets 0, 120 and 260 exactly.
pub fn three_frame_corpus() -> (Vec<u8>, [u64; 3]) {
    let mut data = String::new();
    data.push_str(&frame_record(1, 103));
    assert_eq!(data.len(), 120);
    data.push_str(&frame_record(2, 123));
    assert_eq!(data.len(), 260);
    data.push_str(&frame_record(3, 43));
    (data.into_bytes(), [0, 120, 260])
}

/// Frame sink that parses records and remembers what it consumed.
#[derive(Default)]
pub struct ObjectSetSink {
    pub frames: Vec<u64>,
    pub payload_bytes: Vec<usize>,
}

impl<S: TrajStream> FrameSink<S> for ObjectSetSink {
    fn reload_objects(&mut self, stream: &mut S) -> Result<(), IncompleteFrame> {
        let mut line = String::new();
        stream.read_line(&mut line);
        if stream.at_eof() || !line.starts_with(FRAME_TAG) {
            return Err(IncompleteFrame);
        }
        let number: u64 = line[FRAME_TAG.len()..]
            .trim()
            .parse()
            .map_err(|_| IncompleteFrame)?;
        let mut payload = 0;
        loop {
            stream.read_line(&mut line);
            if stream.at_eof() || !stream.is_healthy() {
                return Err(IncompleteFrame);
            }
            if line == "#end" {
                break;
            }
            payload += line.len();
        }
        self.frames.push(number);
        self.payload_bytes.push(payload);
        Ok(())
    }
}

/// Simulation double with a hand-set clock and scripted failures.
#[derive(Default)]
pub struct ScriptedSim {
    pub time: f64,
    pub relax_calls: u32,
    pub unrelax_calls: u32,
    pub evaluated: Vec<String>,
    pub fail_on: Option<String>,
}

impl Simulation for ScriptedSim {
    fn time(&self) -> f64 {
        self.time
    }

    fn relax(&mut self) {
        self.relax_calls += 1;
    }

    fn unrelax(&mut self) {
        self.unrelax_calls += 1;
    }

    fn evaluate(&mut self, activity: &str) -> Result<(), EvalError> {
        if self.fail_on.as_deref() == Some(activity) {
            return Err(EvalError::new("scripted failure"));
        }
        self.evaluated.push(activity.to_string());
        Ok(())
    }
}
