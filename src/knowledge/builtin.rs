use super::{ CompanyInfo, Contact, KnowledgeBase, Service, Value };

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn value(title: &str, description: &str) -> Value {
    Value { title: title.to_string(), description: description.to_string() }
}

fn company() -> CompanyInfo {
    CompanyInfo {
        name: "Dynamic Recruitment and Management Consultancy Limited (DRMC Ltd)".to_string(),
        tagline: "Your trusted partner in workforce development and organizational excellence.".to_string(),
        about: [
            "Dynamic Recruitment and Management Consultancy Limited (DRMC Ltd.) is a Lagos-based human resource and management consultancy firm committed to bridging the gap between job seekers and employers.",
            "We provide customized recruitment, training, and advisory solutions that help organizations attract, develop, and retain top talents.",
            "Our team of seasoned professionals brings years of experience across multiple industries, ensuring that every client receives practical, innovative, and sustainable solutions to workforce and organizational challenges.",
            "Whether you are a growing business seeking the right talent or an individual aiming to advance your career, we provide the tools, guidance, and opportunities to help you succeed.",
        ].join("\n\n"),
        vision: "To be Nigeria\u{2019}s most trusted and result-driven recruitment and management consultancy firm, empowering people and organizations to achieve excellence through strategic talent and capacity development.".to_string(),
        mission: "To provide innovative recruitment, training, and management solutions that foster productivity, growth, and long-term success for our clients, while creating meaningful employment and development opportunities for professionals across Nigeria and beyond.".to_string(),
        values: vec![
            value(
                "Integrity",
                "We uphold honesty, transparency, and ethical standards in all our dealings, building trust with clients, partners, and candidates alike."
            ),
            value(
                "Excellence",
                "We are committed to delivering outstanding services and measurable results through continuous improvement and innovation."
            ),
            value(
                "Professionalism",
                "We conduct our business with the highest level of competence, responsibility, and respect for every individual and organization we serve."
            ),
            value(
                "Innovation",
                "We embrace creativity and technology-driven approaches to recruitment, management, and training, ensuring relevance in an ever-changing business environment."
            ),
            value(
                "Collaboration",
                "We foster strong partnerships with clients and stakeholders, working together to achieve sustainable goals and shared success."
            ),
            value(
                "Empowerment",
                "We empower job seekers, employees, and organizations with knowledge, skills, and opportunities to reach their full potential."
            ),
        ],
        contact: Contact {
            address: "No 2, Martins Street, off Teju Osho Market, Oju-Elegba Road, Surulere, Lagos State, Nigeria.".to_string(),
            emails: strings(
                &[
                    "info.dynamicrmcltd@gmail.com",
                    "hr@dynamicrmcltd.com.ng",
                    "operations@dynamicrmcltd.com.ng",
                ]
            ),
            phones: strings(&["08034012264", "08138090286", "09060234049"]),
            whatsapp: "09136073791".to_string(),
        },
    }
}

fn services() -> Vec<Service> {
    vec![
        Service {
            id: "recruitment".to_string(),
            title: "Recruitment & Staffing".to_string(),
            short_description: "Connecting top talent with leading organizations.".to_string(),
            full_description: "Our Recruitment & Staffing solution is designed to take the guesswork out of hiring. We leverage deep market insights and a robust network of professionals to connect your organization with candidates who possess not just the right skills, but the right cultural fit. From entry-level positions to C-suite executives, our rigorous screening process ensures you only see the best.".to_string(),
            details: strings(
                &[
                    "Permanent, temporary, and contract staffing solutions",
                    "Executive search and headhunting",
                    "Comprehensive background checks and verification",
                    "Strategic talent acquisition planning",
                ]
            ),
            benefits: strings(
                &[
                    "Reduce time-to-hire by up to 40%",
                    "Minimize hiring risks with thorough vetting",
                    "Access a hidden market of passive candidates",
                    "Scale your workforce on demand",
                ]
            ),
            icon_name: "Users".to_string(),
            image: "https://i.ibb.co/JWmD4X2P/Dynamic-RMC-2-1.jpg".to_string(),
        },
        Service {
            id: "hr-consultancy".to_string(),
            title: "HR Consultancy".to_string(),
            short_description: "Expert advice on HR policies and structures.".to_string(),
            full_description: "Navigate the complexities of human resource management with confidence. Our consultancy services provide the architectural framework for a thriving workplace. We analyze your current HR health, identify gaps, and implement compliant, effective policies that drive employee engagement and operational efficiency.".to_string(),
            details: strings(
                &[
                    "Custom HR policy development and handbook creation",
                    "Performance management system design",
                    "Organizational restructuring and change management",
                    "Compliance audits (Labor Law & Regulations)",
                ]
            ),
            benefits: strings(
                &[
                    "Ensure full legal compliance",
                    "Boost employee retention and satisfaction",
                    "Streamline internal processes",
                    "Create a performance-driven culture",
                ]
            ),
            icon_name: "Briefcase".to_string(),
            image: "https://i.ibb.co/rGp42nFs/Dynamic-RMC-3-1.jpg".to_string(),
        },
        Service {
            id: "training".to_string(),
            title: "Training & Capacity Building".to_string(),
            short_description: "Upskilling your workforce for better results.".to_string(),
            full_description: "In a rapidly evolving business landscape, continuous learning is the key to competitiveness. Our training programs are bespoke, practical, and results-oriented. We don't just teach theory; we provide actionable tools that your teams can apply immediately to improve productivity and innovation.".to_string(),
            details: strings(
                &[
                    "Corporate training and retreats",
                    "Soft skills workshops (Communication, Teamwork, EI)",
                    "Employee onboarding and induction programs",
                    "Leadership and management development",
                ]
            ),
            benefits: strings(
                &[
                    "Bridge skill gaps effectively",
                    "Increase employee motivation and loyalty",
                    "Foster a culture of innovation",
                    "Measurable ROI on training investment",
                ]
            ),
            icon_name: "GraduationCap".to_string(),
            image: "https://i.ibb.co/Kc1JgMFH/Dynamic-RMC-4-1.jpg".to_string(),
        },
        Service {
            id: "career-dev".to_string(),
            title: "Career Development".to_string(),
            short_description: "Helping individuals achieve their career goals.".to_string(),
            full_description: "For ambitious professionals, we offer more than just job placement. Our Career Development services act as a personal accelerator for your professional journey. Whether you are a fresh graduate or a seasoned manager looking to pivot, we provide the tools and coaching necessary to stand out in a crowded marketplace.".to_string(),
            details: strings(
                &[
                    "Professional CV and Cover Letter writing",
                    "Mock interviews and preparation sessions",
                    "Personalized job placement assistance",
                    "One-on-one career coaching",
                ]
            ),
            benefits: strings(
                &[
                    "Stand out to recruiters immediately",
                    "Navigate career transitions smoothly",
                    "Negotiate better compensation packages",
                    "Build a long-term career roadmap",
                ]
            ),
            icon_name: "TrendingUp".to_string(),
            image: "https://i.ibb.co/dsKFZngH/Dynamic-RMC-5-1.jpg".to_string(),
        },
        Service {
            id: "management-consulting".to_string(),
            title: "Management Consulting".to_string(),
            short_description: "Optimizing business processes and strategy.".to_string(),
            full_description: "Drive sustainable growth with our strategic management consulting. We partner with leadership teams to solve complex business challenges. By analyzing your operations, strategy, and market position, we help you make data-driven decisions that improve profitability and operational resilience.".to_string(),
            details: strings(
                &[
                    "Business process improvement and optimization",
                    "Strategic planning and execution",
                    "Team optimization and role definition",
                    "Change management and transformation",
                ]
            ),
            benefits: strings(
                &[
                    "Identify and eliminate operational bottlenecks",
                    "Align resources with strategic goals",
                    "Improve decision-making speed",
                    "Enhance overall business agility",
                ]
            ),
            icon_name: "BarChart".to_string(),
            image: "https://i.ibb.co/Kp5DbWY0/Dynamic-RMC-6-1.jpg".to_string(),
        }
    ]
}

pub(super) fn knowledge_base() -> KnowledgeBase {
    KnowledgeBase { company: company(), services: services() }
}
