//! Writes `sample_results.json` and `sample_results.csv`, a synthetic search
//! result that can be opened with "Arquivo → Abrir resultados…" without a
//! running backend.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde_json::{json, Map, Value as JsonValue};

use vc_scout::data::normalize::normalize_payload;
use vc_scout::export::export_to_path;

const VCS: [&str; 3] = ["Kaszek", "Monashees", "Sequoia Capital"];
const SECTORS: [&str; 6] = ["Fintech", "Healthtech", "Edtech", "Agtech", "SaaS", "Logística"];
const ROUNDS: [&str; 5] = ["Seed", "Série A", "Série B", "Série C", "Bridge"];
const PREFIXES: [&str; 8] = ["Nu", "Pag", "Agro", "Edu", "Medi", "Log", "Cloud", "Data"];
const SUFFIXES: [&str; 6] = ["bank", "fy", "hub", "tech", "ly", "ai"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

/// Investment value in one of the shapes the backend is known to send.
fn investment_value(rng: &mut SimpleRng) -> JsonValue {
    let millions = 0.2 + rng.next_f64() * 40.0;
    match rng.below(5) {
        0 => json!((millions * 1_000_000.0).round()),
        1 => json!(format!("US$ {:.1}M", millions)),
        2 => json!(format!("R$ {}", (millions * 1_000_000.0).round() as i64)),
        3 => json!(format!("{}k", (millions * 1_000.0).round() as i64)),
        _ => json!("Não divulgado"),
    }
}

/// One raw startup object. Key names vary between the aliases the
/// normalizer accepts.
fn startup(rng: &mut SimpleRng, vc: &str, n: usize) -> JsonValue {
    let name = format!("{}{}", rng.pick(&PREFIXES), rng.pick(&SUFFIXES));
    let slug = name.to_lowercase();
    let mut obj = Map::new();

    let name_key = if n % 3 == 0 { "name" } else { "nome" };
    obj.insert(name_key.into(), json!(name));
    obj.insert("site".into(), json!(format!("https://{slug}.com.br")));
    let sector_key = if n % 2 == 0 { "setor" } else { "sector" };
    obj.insert(sector_key.into(), json!(rng.pick(&SECTORS)));
    if rng.below(6) != 0 {
        obj.insert("ano_fundacao".into(), json!(2008 + rng.below(16) as i64));
    }
    obj.insert("valor_investimento".into(), investment_value(rng));
    obj.insert("rodada".into(), json!(rng.pick(&ROUNDS)));
    obj.insert(
        "data_investimento".into(),
        json!(format!("{:02}/20{:02}", 1 + rng.below(12), 15 + rng.below(10))),
    );
    obj.insert("vc".into(), json!(vc));
    obj.insert(
        "descricao".into(),
        json!(format!("Startup de {} investida pela {vc}.", slug)),
    );
    if rng.below(3) != 0 {
        obj.insert(
            "linkedin_fundador".into(),
            json!(format!("https://www.linkedin.com/in/fundador-{slug}")),
        );
    }
    JsonValue::Object(obj)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let mut items = Vec::new();
    for vc in VCS {
        for n in 0..8 {
            items.push(startup(&mut rng, vc, n));
        }
    }
    let payload = json!({ "resultado": items });

    let json_path = Path::new("sample_results.json");
    let writer = BufWriter::new(File::create(json_path)?);
    serde_json::to_writer_pretty(writer, &payload)?;

    let records = normalize_payload(payload["resultado"].clone());
    let csv_path = Path::new("sample_results.csv");
    let rows = export_to_path(csv_path, records.iter())?;

    println!(
        "Wrote {} startups to {} and {rows} rows to {}",
        records.len(),
        json_path.display(),
        csv_path.display()
    );
    Ok(())
}
