use idate_deck::{Code, Diagnostic, Pass, Severity};

use crate::check::Check;
use crate::context::Context;

/// Material card sanity and the optional numbering convention
pub struct MaterialCheck;

impl Check for MaterialCheck {
    fn pass(&self) -> Pass {
        Pass::Materials
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        let mut found = Vec::new();

        if ctx.symbols.materials.is_empty() {
            found.push(Diagnostic::new(
                Severity::Warning,
                self.pass(),
                Code::NoMaterials,
                "no materials are defined, every cell is void",
            ));
        }

        for (card, material) in ctx.deck.materials() {
            for c in material.components.iter().filter(|c| c.fraction == 0.0) {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::ZeroFraction,
                        format!("material {} gives {} a zero fraction", material.id, c.zaid),
                    )
                    .at(card.span),
                );
            }

            if material.has_mixed_fractions() {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::MixedFractionTypes,
                        format!("material {} mixes atom and mass fractions", material.id),
                    )
                    .at(card.span)
                    .with_hint("use positive atom fractions or negative mass fractions throughout"),
                );
            }

            let classifier = &ctx.config.classifier;
            if !classifier.is_empty() && classifier.classify(material.id).is_none() {
                found.push(
                    Diagnostic::new(
                        Severity::Info,
                        self.pass(),
                        Code::UnclassifiedMaterial,
                        format!("material {} is outside every configured class", material.id),
                    )
                    .at(card.span),
                );
            }
        }

        found
    }
}

#[cfg(test)]
mod materials_tests {
    use super::*;
    use crate::passes::run_check;
    use crate::ValidatorConfig;
    use idate_catalogue::MaterialClassifier;

    #[test]
    fn void_deck_has_no_materials() {
        let text = "S\n1 0 -1 imp:n=1\n\n1 so 5.0\n\nmode n\n";
        let found = run_check(&MaterialCheck, text, &ValidatorConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, Code::NoMaterials);
        assert_eq!(found[0].severity, Severity::Warning);
    }

    #[test]
    fn fractions() {
        let text = "t\n1 1 -1 -1\n2 0 1\n\n1 so 1\n\nm1 1001 2 8016 -1 6000 0\n";
        let codes: Vec<_> = run_check(&MaterialCheck, text, &ValidatorConfig::default())
            .into_iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(codes, vec![Code::ZeroFraction, Code::MixedFractionTypes]);
    }

    #[test]
    fn classifier_is_opt_in() {
        let text = "t\n1 150 -1 -1\n2 0 1\n\n1 so 1\n\nm150 1001 2 8016 1\n";
        assert!(run_check(&MaterialCheck, text, &ValidatorConfig::default()).is_empty());

        let config = ValidatorConfig {
            classifier: MaterialClassifier::default().with_class("fuel", 1, 99).unwrap(),
            ..Default::default()
        };
        let found = run_check(&MaterialCheck, text, &config);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, Code::UnclassifiedMaterial);
    }
}
