use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> String {
    let scored = ctx.scored().count();
    let failed = ctx.failed().count();

    let mut out = String::new();
    out.push_str(&format!("kira-instability v{}\n", ctx.report.version));
    out.push_str(&format!(
        "Input: {} samples, {} regions, weighting={}\n",
        ctx.sample_sets.len(),
        ctx.regions.len(),
        ctx.weighting.as_str()
    ));
    out.push_str(&format!("Scored: {}, failed: {}\n", scored, failed));
    for (region, index) in ctx.scored() {
        out.push_str(&format!(
            "  {}\t{}\t{:.3}\n",
            region.sample, region.descriptor.region_name, index.instability_index
        ));
    }
    if failed > 0 || !ctx.key_failures.is_empty() {
        out.push_str("Failures:\n");
        for message in &ctx.key_failures {
            out.push_str(&format!("- key: {}\n", message));
        }
        for (region, err) in ctx.failed() {
            out.push_str(&format!(
                "- {}/{}: {}\n",
                region.sample, region.descriptor.region_name, err
            ));
        }
    }
    out
}
