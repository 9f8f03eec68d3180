use shadow_rs::BuildPattern;
use shadow_rs::ShadowBuilder;

fn main() -> Result<(), shadow_rs::ShadowError> {
    // Only git/build metadata is needed for `--version`.
    ShadowBuilder::builder()
        .build_pattern(BuildPattern::Lazy)
        .deny_const(Default::default())
        .build()?;

    Ok(())
}
