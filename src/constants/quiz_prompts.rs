use crate::models::domain::QuestionType;

pub const QUESTION_GENERATOR_PROMPT: &str = r#"You are a quiz generation agent optimized for creating accurate questions grounded in the provided study context.

## PRIMARY OBJECTIVE

Generate quiz questions that:
1. Are factually supported by the provided context (HIGHEST PRIORITY)
2. Match the requested question type and difficulty exactly
3. Are clear, specific, and answerable from the context alone
4. Never repeat a question listed under DO NOT REPEAT

## ACCURACY REQUIREMENTS

**ABSOLUTE PRIORITY: Every question and answer must be directly supported by the context.**

- Do not infer, extrapolate, or add information not present in the context
- Make incorrect options plausible but clearly wrong given the context
- Each explanation must say why the answer is correct, citing the context where applicable

## QUESTION TYPE REQUIREMENTS

### multiple_choice
- Exactly FOUR options, plain text without letter prefixes
- Exactly ONE option is correct
- correct_answer is the exact text of the correct option

### true_false
- question is a single statement that is definitively true or false
- Avoid ambiguous or partially true statements
- options is an empty array
- correct_answer is exactly "true" or "false"

### short_answer
- question requires a brief written response (1-3 sentences)
- correct_answer is the ideal answer
- key_points lists the facts a correct response should mention
- options is an empty array

## JSON OUTPUT FORMAT

Return ONLY a JSON array of question records conforming to the schema provided in the request. No additional text, markdown, or commentary.

Each record contains these fields:
- question: string (the question text)
- options: array of strings (exactly 4 for multiple_choice, [] otherwise)
- correct_answer: string (see type requirements above)
- explanation: string (why the answer is correct)
- key_points: array of strings ([] except for short_answer)

## CONSTRAINT VALIDATION

- Generate EXACTLY the requested number of records
- No two records may share the same question text
- The JSON must be parseable without any preprocessing

## OUTPUT INSTRUCTIONS

Return ONLY the JSON array. Do not include:
- Explanatory text before or after the JSON
- Markdown code blocks or formatting
- Multiple JSON documents"#;

pub const ANSWER_JUDGE_PROMPT: &str = r#"You are a grading agent for short-answer quiz responses.

## PRIMARY OBJECTIVE

Decide whether the user's answer demonstrates the understanding captured by the reference answer.

## GRADING CRITERIA

- Does the user's answer contain the main ideas of the reference answer?
- Are the key facts correct?
- Wording may differ freely; meaning is what counts
- An answer that contradicts a key point is incorrect

## OUTPUT INSTRUCTIONS

Respond with only "CORRECT" or "INCORRECT" followed by one brief sentence of feedback for the user. No other text."#;

/// Example record embedded in generation requests so the model sees a
/// concrete instance of the schema for the requested type.
pub fn generation_example(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::MultipleChoice => {
            r#"{
    "question": "Which gas do plants absorb during photosynthesis?",
    "options": ["Oxygen", "Carbon dioxide", "Nitrogen", "Hydrogen"],
    "correct_answer": "Carbon dioxide",
    "explanation": "The context states that plants take in carbon dioxide and release oxygen.",
    "key_points": []
}"#
        }
        QuestionType::TrueFalse => {
            r#"{
    "question": "Photosynthesis releases oxygen as a byproduct.",
    "options": [],
    "correct_answer": "true",
    "explanation": "The context states that oxygen is released when plants convert light to energy.",
    "key_points": []
}"#
        }
        QuestionType::ShortAnswer => {
            r#"{
    "question": "Why do plants need sunlight?",
    "options": [],
    "correct_answer": "Sunlight provides the energy plants use to convert carbon dioxide and water into glucose.",
    "explanation": "The context describes light as the energy source for photosynthesis.",
    "key_points": ["energy source", "converts carbon dioxide and water", "produces glucose"]
}"#
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_prompt_covers_every_question_type() {
        assert!(QUESTION_GENERATOR_PROMPT.contains("multiple_choice"));
        assert!(QUESTION_GENERATOR_PROMPT.contains("true_false"));
        assert!(QUESTION_GENERATOR_PROMPT.contains("short_answer"));
        assert!(QUESTION_GENERATOR_PROMPT.contains("JSON array"));
    }

    #[test]
    fn judge_prompt_demands_binary_verdict() {
        assert!(ANSWER_JUDGE_PROMPT.contains("\"CORRECT\" or \"INCORRECT\""));
    }

    #[test]
    fn generation_examples_parse_as_valid_records() {
        use crate::models::dto::GeneratedQuestionDto;

        for question_type in [
            QuestionType::MultipleChoice,
            QuestionType::TrueFalse,
            QuestionType::ShortAnswer,
        ] {
            let example = generation_example(question_type);
            let dto: GeneratedQuestionDto =
                serde_json::from_str(example).expect("example should parse");
            assert!(!dto.question.is_empty());
        }
    }
}
