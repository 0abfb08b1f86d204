// Instruction templates and rubrics
//
// Prompt text is not a contract: only the completion sentinel is, because
// downstream control flow branches on exact string equality against it.

/// The exact phrase a critic emits to signal no further action is needed.
/// Matched case-sensitively, never fuzzily.
pub const COMPLETION_PHRASE: &str = "No major issues found.";

/// Name of the tool a refiner calls to terminate its enclosing loop.
pub const EXIT_LOOP_TOOL: &str = "exit_loop";

pub const EXIT_LOOP_DESCRIPTION: &str = "Call this function ONLY when the critique indicates no \
     further changes are needed, signaling the iterative process should end.";

/// Instruction for the image-analysis invocation (structured output mode).
pub const IMAGE_ANALYSIS_INSTRUCTION: &str = "\
Describe the product you are seeing in this image.

Return a single JSON object with exactly these fields:
  \"name\": product name,
  \"weight\": product weight as printed on the packaging (or \"unknown\"),
  \"attributes\": list of notable product attributes,
  \"manufacturer\": manufacturer name (or \"unknown\"),
  \"description\": one-paragraph factual description of what is visible.

Output only the JSON object.";

/// Instruction template for the initial draft. `{current_product_description}`
/// holds the image-analysis record at this point.
pub const INITIAL_DRAFT_TEMPLATE: &str = "\
You are a highly skilled E-commerce Copywriter specializing in persuasive product descriptions.
Your task is to write a well-structured, engaging, benefit-driven product description for an online store.

**Product Information:**
{current_product_description}

**Structure Requirements (aim for 100-200 words total):**
1. Compelling opening (1-2 sentences) that addresses a customer pain point or leads with a primary benefit.
2. Key features and benefits (1-2 paragraphs OR 3-5 bullet points); for each feature, say what it does for the customer.
3. Ideal user or scenario (1-2 sentences).
4. A concluding, persuasive call-to-value (1 sentence).

**Tone:** professional, enticing, customer-focused.
**Output format:** Markdown.

Output only the complete product description text. No introductory phrases, explanations, or conversational filler.";

/// A named set of evaluation criteria driving one refinement loop.
#[derive(Debug, Clone, Copy)]
pub struct Rubric {
    pub name: &'static str,
    pub critique_template: &'static str,
    pub refine_template: &'static str,
}

/// Engagement-focused rubric (clarity, benefits, emotional appeal).
pub const ENGAGEMENT_RUBRIC: Rubric = Rubric {
    name: "engagement",
    critique_template: "\
You are a Constructive Critic AI reviewing a short product description draft (typically 2-6 sentences).
Your goal is balanced feedback on reader engagement.

Key metrics:
- Clarity and readability
- Completeness and accuracy
- Value proposition and benefits focus
- Tone of voice and brand consistency
- Uniqueness and differentiation
- Emotional appeal and storytelling
- Call to action (implicit or explicit)

**Product Description to Review:**
```
{current_product_description}
```

**Task:**
IF you identify 1-2 clear and actionable ways the description could better capture the product or engage the reader:
provide the suggestions as bullet points. Output only the critique text.

ELSE IF the description is coherent, covers the product adequately for its length, and has no glaring errors or omissions:
respond exactly with the phrase \"No major issues found.\" and nothing else. It does not need to be perfect, \
just functionally complete for this stage. Avoid purely subjective stylistic preferences if the core is sound.

Do not add explanations. Output only the critique OR the exact completion phrase.",
    refine_template: "\
You are a Creative Product Description Writing Assistant refining a document based on feedback OR exiting the process.

**Current Description:**
```
{current_product_description}
```

**Critique/Suggestions:**
{criticism}

**Task:**
Analyze the 'Critique/Suggestions'.
IF the critique is exactly \"No major issues found.\":
you MUST call the 'exit_loop' function. Do not output any text.
ELSE (the critique contains actionable feedback):
carefully apply the suggestions to improve the current description. Output only the refined description text.

Do not add explanations. Either output the refined description OR call the exit_loop function.",
};

/// SEO-focused rubric (keywords, conciseness, search alignment).
pub const SEO_RUBRIC: Rubric = Rubric {
    name: "seo",
    critique_template: "\
You are a Constructive Critic AI reviewing a short product description draft (typically 2-6 sentences) for search engine effectiveness.

**Product Description to Review:**
```
{current_product_description}
```

**Task:**
Review the description for search engine alignment. Consider:
- Keyword relevance: does it use keywords naturally related to the product name?
- Clarity and conciseness: is it easy to understand and to the point?
- Call to action: does it encourage a purchase or further interest?
- Readability: is it well structured?

IF you identify 1-2 clear and actionable ways to improve search engine effectiveness:
provide the suggestions as bullet points. Output only the critique text.

ELSE IF the description is coherent, covers the product adequately for its length, and has no glaring errors or omissions:
respond exactly with the phrase \"No major issues found.\" and nothing else. It does not need to be perfect, \
just functionally complete for this stage. Avoid purely subjective stylistic preferences if the core is sound.

Do not add explanations. Output only the critique OR the exact completion phrase.",
    refine_template: "\
You are a Creative Product Description Writing Assistant focused on search engine optimization, refining a document based on feedback OR exiting the process.

**Current Description:**
```
{current_product_description}
```

**Critique/Suggestions:**
{criticism}

**Task:**
Analyze the 'Critique/Suggestions'.
IF the critique is exactly \"No major issues found.\":
you MUST call the 'exit_loop' function. Do not output any text.
ELSE (the critique contains actionable feedback):
carefully apply the suggestions to improve the current description. Output only the refined description text.

Do not add explanations. Either output the refined description OR call the exit_loop function.",
};

#[cfg(test)]
mod tests {
    use super::*;

    // The loop branches on exact equality against COMPLETION_PHRASE, so the
    // instructions must quote it verbatim.
    #[test]
    fn test_critique_templates_quote_the_sentinel() {
        for rubric in [ENGAGEMENT_RUBRIC, SEO_RUBRIC] {
            assert!(
                rubric.critique_template.contains(COMPLETION_PHRASE),
                "{} critique template must quote the completion phrase",
                rubric.name
            );
            assert!(
                rubric.refine_template.contains(COMPLETION_PHRASE),
                "{} refine template must quote the completion phrase",
                rubric.name
            );
        }
    }

    #[test]
    fn test_refine_templates_reference_the_exit_tool() {
        for rubric in [ENGAGEMENT_RUBRIC, SEO_RUBRIC] {
            assert!(rubric.refine_template.contains(EXIT_LOOP_TOOL));
        }
    }

    #[test]
    fn test_templates_read_the_expected_state_keys() {
        for rubric in [ENGAGEMENT_RUBRIC, SEO_RUBRIC] {
            assert!(rubric
                .critique_template
                .contains("{current_product_description}"));
            assert!(rubric
                .refine_template
                .contains("{current_product_description}"));
            assert!(rubric.refine_template.contains("{criticism}"));
        }
        assert!(INITIAL_DRAFT_TEMPLATE.contains("{current_product_description}"));
    }
}
