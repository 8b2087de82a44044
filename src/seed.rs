//! Reference content shipped with the advisor: educational articles and FAQs.
//!
//! Seeding goes through the same orchestrator as a migration, so the rows are
//! validated, batched and upserted. Re-seeding is a no-op.

use crate::migration::{BatchWriter, MigrationPlan, StaticSource, TableUnit, TargetStore};
use crate::repository::{EducationalContentRecord, FaqRecord};

const SEEDED_AT: &str = "2024-01-01T00:00:00Z";

fn article(id: &str, slug: &str, title: &str, category: &str, body: &str) -> EducationalContentRecord {
    EducationalContentRecord {
        id: id.to_string(),
        slug: slug.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        body: body.to_string(),
        published: true,
        created_at: SEEDED_AT.to_string(),
    }
}

fn faq(id: &str, sort_order: i32, category: &str, question: &str, answer: &str) -> FaqRecord {
    FaqRecord {
        id: id.to_string(),
        question: question.to_string(),
        answer: answer.to_string(),
        category: category.to_string(),
        sort_order,
        created_at: SEEDED_AT.to_string(),
    }
}

pub fn educational_contents() -> Vec<EducationalContentRecord> {
    vec![
        article(
            "seed-edu-reading-labels",
            "reading-drug-facts-labels",
            "Reading a Drug Facts label",
            "basics",
            "Every over-the-counter medicine carries a Drug Facts label. Check the active \
             ingredient first, then the uses, warnings and directions. Two products with \
             different brand names can contain the same active ingredient.",
        ),
        article(
            "seed-edu-acetaminophen",
            "acetaminophen-daily-limit",
            "Staying under the acetaminophen daily limit",
            "pain-relief",
            "Acetaminophen is found in many cold, flu and sleep products. Add up every \
             product you take in a day and never exceed the maximum on the label. Heavy \
             alcohol use increases the risk of liver damage.",
        ),
        article(
            "seed-edu-nsaids",
            "nsaids-and-stomach",
            "NSAIDs and your stomach",
            "pain-relief",
            "Ibuprofen and naproxen can irritate the stomach lining. Take them with food, \
             use the lowest dose that works, and ask a pharmacist first if you have ulcers, \
             kidney disease or take blood thinners.",
        ),
        article(
            "seed-edu-children",
            "dosing-for-children",
            "Dosing medicines for children",
            "pediatrics",
            "Children's doses depend on weight more than age. Use the measuring device that \
             comes with the product and never give adult formulations to young children \
             unless a clinician tells you to.",
        ),
        article(
            "seed-edu-when-to-see-doctor",
            "when-to-see-a-doctor",
            "When self-care is not enough",
            "safety",
            "Seek medical care for chest pain, trouble breathing, a fever above 39.4 °C that \
             does not come down, symptoms lasting more than a week, or any symptom that \
             worsens despite treatment.",
        ),
    ]
}

pub fn faqs() -> Vec<FaqRecord> {
    vec![
        faq(
            "seed-faq-replace-doctor",
            1,
            "general",
            "Does this advisor replace my doctor or pharmacist?",
            "No. It offers general information about over-the-counter medicines. Always \
             follow the label and ask a health professional when in doubt.",
        ),
        faq(
            "seed-faq-combine",
            2,
            "safety",
            "Can I take two cold medicines at the same time?",
            "Often not. Many combination products share active ingredients such as \
             acetaminophen. Compare the active ingredients before combining products.",
        ),
        faq(
            "seed-faq-pregnancy",
            3,
            "safety",
            "Are over-the-counter medicines safe during pregnancy?",
            "Some are and some are not. Speak with your doctor or pharmacist before taking \
             any medicine while pregnant or breastfeeding.",
        ),
        faq(
            "seed-faq-missed-dose",
            4,
            "dosing",
            "What should I do if I miss a dose?",
            "Take it when you remember unless it is nearly time for the next dose. Do not \
             double up to make up for a missed dose.",
        ),
        faq(
            "seed-faq-expired",
            5,
            "storage",
            "Can I use medicine after its expiry date?",
            "It is best not to. Expired medicine may be less effective. Dispose of it through \
             a pharmacy take-back program where available.",
        ),
    ]
}

/// In-memory sources for the seed tables.
pub struct SeedData {
    contents: StaticSource<EducationalContentRecord>,
    faqs: StaticSource<FaqRecord>,
}

impl SeedData {
    pub fn new() -> Self {
        Self {
            contents: StaticSource::new(educational_contents()),
            faqs: StaticSource::new(faqs()),
        }
    }

    /// Plan writing the seed tables into any target.
    pub fn plan<'a, T>(&'a self) -> MigrationPlan<'a, T>
    where
        T: TargetStore + 'a,
        T::Tx: BatchWriter<EducationalContentRecord> + BatchWriter<FaqRecord>,
    {
        vec![
            Box::new(TableUnit::<_, EducationalContentRecord>::new(&self.contents)),
            Box::new(TableUnit::<_, FaqRecord>::new(&self.faqs)),
        ]
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self::new()
    }
}
