//! Example usage of the lof-filter library.

use lof_filter::report::{detailed_header, detailed_rows, population_frequencies, summarize};
use lof_filter::{Database, DbConfig, Gene, Orchestrator, VcfTextSource};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
default: gnomadv2.1.1
databases:
  gnomadv2.1.1:
    exomes:
      url: gnomad.exomes.r2.1.1.sites.vcf.bgz
      lof:
        id: vep
        annot: LoF
        filters:
          confidence: HC
      predefined-filters:
        homozygous-controls: controls_nhomalt>0
      pop-freqs:
        afr: AF_afr
        nfe: AF_nfe
"#;

const VCF: &str = concat!(
    "##fileformat=VCFv4.2\n",
    "##INFO=<ID=vep,Number=.,Type=String,Description=\"Consequence annotations from Ensembl VEP. Format: Allele|Consequence|IMPACT|SYMBOL|Gene|Feature|LoF\">\n",
    "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n",
    "3\t46414943\trs333\tTACAGTCAGTATCAATTCTGGAAGAATTTCCAG\tT\t1234.5\tPASS\tAF_afr=0.002;AF_nfe=0.11;controls_nhomalt=2;vep=T|frameshift_variant|HIGH|CCR5|ENSG00000160791|ENST00000292303|HC\n",
    "3\t46415001\trs1800560\tC\tT\t88.1\tAC0\tAF_nfe=0.0001;controls_nhomalt=0;vep=T|stop_gained|HIGH|CCR5|ENSG00000160791|ENST00000292303|HC\n",
    "3\t46450012\t.\tG\tA\t60.2\tPASS\tcontrols_nhomalt=0;vep=A|missense_variant|MODERATE|CCRL2|ENSG00000121797|ENST00000400888|\n",
);

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .init();

    let config = match DbConfig::from_yaml(CONFIG, None) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let filters = match config.build_filters(&["homozygous-controls"], &[]) {
        Ok(filters) => filters,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut databases = Vec::new();
    for file in &config.files {
        match Database::open(file.clone(), Box::new(VcfTextSource::new(VCF))) {
            Ok(database) => databases.push(database),
            Err(e) => tracing::error!(database = %file.name, "{}", e),
        }
    }

    let mut genes = vec![
        Gene::with_location("CCR5", "3:46411633-46417697"),
        Gene::with_location("CCRL2", "3:46448703-46451756"),
        Gene::with_location("BRCA2", "13:32315474-32400266"),
        Gene::new("NOTAGENE"),
    ];

    let mut orchestrator = Orchestrator::new(databases, filters);
    let summary = orchestrator.run(&mut genes);

    println!("LoF Filter Demo");
    println!("===============\n");
    println!("Database: {}", config.name);
    for filter in orchestrator.filters() {
        println!("Filter:   {} ({})", filter.name, filter);
    }
    println!(
        "Records:  {} read, {} dropped, {} with malformed annotations\n",
        summary.records, summary.dropped_records, summary.annotation_errors
    );

    for result in summarize(&genes) {
        println!("  {:<10} {}", result.name, result.status);
    }

    let columns = ["Consequence", "SYMBOL", "Feature", "LoF"];
    println!("\n{}", detailed_header(&columns).join("\t"));
    for gene in &genes {
        for row in detailed_rows(gene, &columns) {
            println!("{}", row.join("\t"));
        }
    }

    if let Some(file) = config.files.first() {
        println!();
        for gene in &genes {
            for variant in gene.passing_variants() {
                let freqs: Vec<String> = population_frequencies(variant, &file.pop_freqs)
                    .into_iter()
                    .map(|(group, value)| format!("{}={}", group, value.unwrap_or(".")))
                    .collect();
                println!("{} {}: {}", gene.name, variant.id, freqs.join(" "));
            }
        }
    }

    for failure in &summary.failures {
        println!("FAILED {} in {}: {}", failure.gene, failure.database, failure.error);
    }
}
