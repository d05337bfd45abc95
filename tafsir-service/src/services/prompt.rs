//! Prompt template for verse commentary.

/// Build the Arabic instruction sent to the model for one verse.
///
/// The reference and text are embedded verbatim, separated by a tab.
pub fn build_prompt(reference: &str, text: &str) -> String {
    format!(
        "أنت عالم متخصص في تفسير القرآن الكريم.\n\
         يرجى تقديم تفسير شامل ومبسط للآية التالية، مع الأخذ بعين الاعتبار رقم السورة ورقم الآية:\n\n\
         {reference}\t{text}\n\n\
         اكتب التفسير باللغة العربية الفصحى وبأسلوب واضح وميسر للقارئ العام."
    )
}
