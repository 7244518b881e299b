/// Builds the fixed prompt sent to the LLM.
/// Only formats text: no parsing, no networking.
pub struct PromptBuilder;

const CONSTRAINTS: [&str; 8] = [
    "Be specific with clear instructions",
    "Be doable within an hour",
    "Be slightly outside most people's comfort zones but not dangerous",
    "Encourage creativity, spontaneity, or social interaction",
    "Not require special equipment or significant money",
    "Be appropriate for adults of any age",
    "Be inspired by Patricia Madson's Improv Wisdom and Keith Johnstone's Impro.",
    "Each generated response should be uniquely distinct from the previous ones.",
];

const MAXIMS: [&str; 13] = [
    "say yes",
    "don't prepare",
    "just show up",
    "start anywhere",
    "be average",
    "pay attention",
    "face the facts",
    "stay on course",
    "wake up to gifts",
    "make mistakes",
    "act now",
    "take care of each other",
    "enjoy the ride",
];

const EXERCISES: [&str; 9] = [
    "Support someone else's dreams. Pick a person (your spouse, child, boss), and, for a week, agree with all of their ideas. Find something right about everything they say or do. Look for every opportunity to offer support. Consider their convenience and time preferences ahead of your own. Give them the spotlight. Notice the results.",
    "For one day say yes to everything. Set your own preferences aside. Notice the results. See how often it may not be convenient or easy to do this. Obviously, use common sense in executing this rule. If you are a diabetic and are offered a big piece of pie, you'll need to find a way to protect your health. Perhaps you can say boldly, \"Yes, I'd love to have this pie to take home to my son who adores cherries.\"",
    "Spend a day without a plan. Have an adventure. Instead of following ordinary routines at this time, open your eyes especially wide and move along with curiosity and attention. Don't consult your to-do list; instead decide what to do based on what needs to be done right now, using your heightened awareness.",
    "Substitute Zen-like attention for planning. When you notice that your mind is planning what you will do or say make a conscious shift of attention to the present moment. Notice everything that is going on now. Attend to what others are saying or doing as if you would need to report it in detail to the CIA. Listen with both ears. Substitute attention to what is happening for attention to what might happen.",
    "Create a simple ritual. Identify a habit that you wish you had. (Exercising, reading regularly, meditating, paying bills.) Think of what will make the habit easy or more attractive to do. (Shall I lay out clothing or equipment, clean or organize your desk or workplace?) Set a time to do the preparatory ritual each day. Focus on doing it faithfully.",
    "Change the location of a familiar activity. Surprise your cohorts by moving the weekly meeting outdoors, to the booth of a coffee bar, to the lounge at a local museum. Try moving a chair into the garden to read a book. Take your lunch to a new location away from your workplace. Explore a new vantage point.",
    "Attend to one thing at a time. Choose an ordinary activity (sorting laundry, eating lunch, brushing your hair) and pay attention only to what you are doing while you are doing it for the duration of the task. Avoid multitasking. If you are eating simply eat. Avoid reading the paper, listening to the radio, or having a conversation. Reflect on the taste of the food, on who prepared it, and how it came to you. If you notice that your mind has wandered, bring it back to what you are doing.",
    "Go for a fifteen-minute walk in your neighborhood. Imagine you have just landed there from another planet. Use all five of the senses: sight, sound, touch, taste, and smell. What surprises you about your environment? What is especially beautiful or noteworthy? What needs doing around here (picking up trash, replacing a fallen garbage-can lid, weeding, sweeping)?",
    "\"What is my purpose now?\" Use this question as a weathervane. Ask it often, especially when you are anxious or unsure of what to do next. When you have the answer, act upon it.",
];

pub const FORMAT_EXAMPLE: &str = r#"{"title":"Dance in Public","description":"Find a busy public area and dance to your favorite song for 30 seconds. Make eye contact with at least one stranger and smile while dancing."}"#;

impl PromptBuilder {
    pub fn build() -> String {
        let mut prompt = String::with_capacity(6 * 1024);

        push_task(&mut prompt);
        push_constraints(&mut prompt);
        push_maxims(&mut prompt);
        push_exercises(&mut prompt);
        push_format_rules(&mut prompt);

        prompt
    }
}

fn push_task(prompt: &mut String) {
    prompt.push_str(
        "Generate a spontaneous, fun, and slightly challenging activity that someone could do \
to break out of their routine and embrace the principles of improvisation.\n\n",
    );
}

fn push_constraints(prompt: &mut String) {
    prompt.push_str("The activity should:\n");
    for line in CONSTRAINTS {
        prompt.push_str("- ");
        prompt.push_str(line);
        prompt.push('\n');
    }
    prompt.push('\n');
}

fn push_maxims(prompt: &mut String) {
    prompt.push_str("Patricia Madson's Improv Wisdom Maxims =\n[");
    prompt.push_str(&MAXIMS.join(", "));
    prompt.push_str("]\n\n");
}

fn push_exercises(prompt: &mut String) {
    prompt.push_str("Some exercises to base these activities off of =\n");
    for exercise in EXERCISES {
        prompt.push_str("- ");
        prompt.push_str(exercise);
        prompt.push('\n');
    }
    prompt.push('\n');
}

fn push_format_rules(prompt: &mut String) {
    prompt.push_str(
        "IMPORTANT: Your response MUST be a valid JSON object with exactly these two fields:\n\
- \"title\": A catchy, concise title for the activity (5 words or less)\n\
- \"description\": A 2-3 sentence description with specific instructions\n\n\
DO NOT include any markdown formatting, code blocks, or explanations outside the JSON.\n\
DO NOT use backticks (`) or any other formatting.\n\
ONLY return the raw JSON object.\n\n\
Example of the EXACT format to use:\n",
    );
    prompt.push_str(FORMAT_EXAMPLE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::llm_decode::decode_activity_json;

    #[test]
    fn prompt_demands_raw_json_with_both_keys() {
        let prompt = PromptBuilder::build();
        assert!(prompt.contains("\"title\""));
        assert!(prompt.contains("\"description\""));
        assert!(prompt.contains("ONLY return the raw JSON object."));
        assert!(prompt.ends_with(FORMAT_EXAMPLE));
    }

    #[test]
    fn prompt_embeds_maxims_and_exercises() {
        let prompt = PromptBuilder::build();
        assert!(prompt.contains("[say yes, don't prepare,"));
        assert!(prompt.contains("enjoy the ride]"));
        for exercise in EXERCISES {
            assert!(prompt.contains(exercise));
        }
    }

    #[test]
    fn format_example_is_itself_a_valid_activity() {
        let activity = decode_activity_json(FORMAT_EXAMPLE).unwrap();
        assert_eq!(activity.title, "Dance in Public");
    }
}
