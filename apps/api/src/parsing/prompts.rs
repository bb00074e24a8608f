// Résumé parse prompt templates.
// The primary source gets one prompt: the extraction rules, the exact JSON
// shape, then the bounded document text.

pub const RESUME_PARSE_RULES: &str = r#"You are an expert resume parser. Extract ALL information from the resume text and return structured JSON.

CRITICAL RULES:
1. NAME: The person's FULL NAME from the first line/header. Usually 2-4 capitalized words like "Arjun Mehta". NEVER leave empty.
2. TITLE: Professional title like "Backend Software Engineer" or "Android Developer". Usually right after the name.
3. CONTACT INFO:
   - EMAIL: any address with an @ symbol
   - PHONE: any phone number, including +91 and +1 formats with spaces or dashes
   - LOCATION: City, Country (e.g. "Bengaluru, India")
   - LINKEDIN: linkedin.com/in/username URL
   - GITHUB: github.com/username URL
4. EXPERIENCE: extract EACH job separately with
   - title: exact job title
   - company: company name only
   - location: city if mentioned
   - startDate: year ("YYYY")
   - endDate: year or "Present"
   - description: all bullet points combined into one description
   - technologies: any tech mentioned for this role
5. EDUCATION: keep degree and institution SEPARATE.
   - degree: ONLY the degree (e.g. "Bachelor of Technology in Computer Science")
   - institution: ONLY the school name (e.g. "XYZ Institute of Technology")
   - field: field of study
   - graduationYear: year of graduation
6. SKILLS: skills are often in tables or labeled lists such as
   | Languages | Java, JavaScript, Python |
   Languages: Java, JavaScript, Python
   Extract ONLY the skill names. NEVER include category labels (Languages, Frontend, Backend, Databases, DevOps, Tools, Frameworks) as skills. Do not invent skills.
7. PROJECTS: extract ALL projects, including those on later pages under a "PROJECTS" header.
   Common formats: "Personal Project - Name" followed by bullets, "Open-source Project - Name", or a title followed by bullets.
   For each project extract title, description (combined bullets), type ("personal", "open-source" or "professional"), technologies (look for "Tech:" lines) and any GitHub URL.

Only extract what is explicitly written. No assumptions.

Return ONLY valid JSON in exactly this shape:
{
  "personalInfo": {
    "name": "Full Name",
    "title": "Professional Title",
    "email": "email@example.com",
    "phone": "+91 90000 12345",
    "location": "City, Country",
    "linkedin": "https://linkedin.com/in/username",
    "github": "https://github.com/username"
  },
  "experience": [
    {
      "title": "Job Title",
      "company": "Company Name",
      "location": "City",
      "startDate": "2022",
      "endDate": "Present",
      "current": true,
      "description": "Combined bullet points as sentences.",
      "technologies": ["Tech1", "Tech2"]
    }
  ],
  "education": [
    {
      "degree": "Bachelor of Technology in Computer Science",
      "institution": "XYZ Institute of Technology",
      "field": "Computer Science",
      "graduationYear": "2023",
      "gpa": ""
    }
  ],
  "skills": ["Java", "JavaScript", "Python"],
  "projects": [
    {
      "title": "Project Name",
      "description": "Description here",
      "type": "personal",
      "technologies": ["React", "Node.js"],
      "url": "",
      "github": ""
    }
  ]
}"#;

pub const RESUME_PARSE_PROMPT: &str = r#"{rules}
RESUME TEXT TO PARSE:
---
{raw_text}
---

REMINDERS:
1. Take the ACTUAL NAME from the first few lines.
2. Find the professional TITLE.
3. Extract ALL contact information.
4. Include ALL work experience with descriptions.
5. Include ALL education entries.
6. List ALL skills mentioned in tables or lists.
7. Extract ALL projects, including ones on page 2.
Now parse the resume and return ONLY valid JSON:"#;

/// Fills the prompt template with the rules and the bounded document text.
pub fn build_parse_prompt(raw_text: &str) -> String {
    RESUME_PARSE_PROMPT
        .replace("{rules}", RESUME_PARSE_RULES)
        .replace("{raw_text}", raw_text)
}
